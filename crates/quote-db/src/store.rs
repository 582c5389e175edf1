//! # Collaborator Traits
//!
//! The two interfaces the session needs from the outside world.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Session                                                                │
//! │     │                                                                   │
//! │     ├──► dyn AuthProvider    sign_up / sign_in / sign_out / current     │
//! │     │        └── LocalAuth (profiles table, argon2)                     │
//! │     │                                                                   │
//! │     └──► dyn QuotationStore  list / create / update / delete            │
//! │              ├── QuotationRepository (SQLite, one owner)                │
//! │              └── MemoryStore (tests, owner views)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Implementations never retry. A failure is returned once and the caller
//! decides what to show.

use async_trait::async_trait;
use quote_core::{QuotationRecord, UserIdentity};

use crate::error::DbResult;

/// Persistence for one user's quotations.
#[async_trait]
pub trait QuotationStore: Send + Sync {
    /// All quotations visible to this store, newest first.
    async fn list(&self) -> DbResult<Vec<QuotationRecord>>;

    /// Persists a new record. The returned copy carries the assigned `id`
    /// and storage timestamps.
    async fn create(&self, record: &QuotationRecord) -> DbResult<QuotationRecord>;

    /// Replaces the record stored under `id`.
    ///
    /// `id`, `owner_id`, `quotation_number` and `created_at` keep their stored
    /// values whatever `record` says.
    async fn update(&self, id: &str, record: &QuotationRecord) -> DbResult<QuotationRecord>;

    /// Removes the record stored under `id`.
    async fn delete(&self, id: &str) -> DbResult<()>;
}

/// Supplies the current user's identity.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Registers a new user and signs them in.
    async fn sign_up(&self, email: &str, password: &str, full_name: &str)
        -> DbResult<UserIdentity>;

    /// Signs in an existing user.
    async fn sign_in(&self, email: &str, password: &str) -> DbResult<UserIdentity>;

    /// Forgets the current user.
    async fn sign_out(&self) -> DbResult<()>;

    /// The signed-in user, if any.
    async fn current_user(&self) -> Option<UserIdentity>;
}
