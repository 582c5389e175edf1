//! # Repository Module
//!
//! Database repository implementations for Mabric Quote.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Session                                                               │
//! │       │                                                                 │
//! │       │  db.quotations_for(user.id).list()                             │
//! │       ▼                                                                 │
//! │  QuotationRepository (owner-scoped)                                    │
//! │  ├── list / get_by_id / find_by_number                                 │
//! │  ├── create / update / delete                                          │
//! │  └── count                                                             │
//! │       │                                                                 │
//! │       │  SQL Query (every statement filters on owner_id)               │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`QuotationRepository`](quotation::QuotationRepository) - Quotation CRUD for one owner
//! - [`ProfileRepository`](profile::ProfileRepository) - Local user profiles

pub mod profile;
pub mod quotation;
