//! # quote-db: Storage and Authentication for Mabric Quote
//!
//! This crate provides the storage collaborator (quotations) and the
//! authentication provider (local profiles). It uses SQLite through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mabric Quote Data Flow                           │
//! │                                                                         │
//! │  Session::submit(form, header)                                         │
//! │       │  finalize() in quote-core                                       │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     quote-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │ SqlitePool    │◄───│ Quotation     │    │ 001_init.sql │  │   │
//! │  │   │               │    │ Profile       │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   store.rs: QuotationStore / AuthProvider traits                │   │
//! │  │   memory.rs: MemoryStore      auth.rs: LocalAuth                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (WAL)  or  :memory:                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use quote_db::{AuthProvider, Database, DbConfig, QuotationStore};
//!
//! let db = Database::new(DbConfig::new("./quotes.db")).await?;
//! let auth = db.auth();
//! let user = auth.sign_in("owner@mabric.in", "secret").await?;
//! let mine = db.quotations_for(&user.id).list().await?;
//! ```

pub mod auth;
pub mod error;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

pub use auth::LocalAuth;
pub use error::{DbError, DbResult};
pub use memory::MemoryStore;
pub use pool::{Database, DbConfig};
pub use repository::profile::ProfileRepository;
pub use repository::quotation::QuotationRepository;
pub use store::{AuthProvider, QuotationStore};
