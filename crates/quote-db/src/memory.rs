//! # In-Memory Quotation Store
//!
//! A [`QuotationStore`] that keeps records in a `Vec`. Used by session tests
//! and anywhere else nothing should touch disk.
//!
//! [`MemoryStore::new`] is the whole store. [`MemoryStore::for_owner`] is a
//! view over the same records that behaves like an owner-scoped
//! `QuotationRepository`: it lists only that owner's rows, reports other
//! owners' ids as not found, and refuses records carrying another owner.
//!
//! [`MemoryStore::set_offline`] makes every call fail with
//! `DbError::ConnectionFailed`, for exercising the "storage rejected the
//! call" paths.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::quotation::generate_quotation_id;
use crate::store::QuotationStore;
use quote_core::validation::validate_record;
use quote_core::QuotationRecord;

#[derive(Debug, Default)]
struct MemoryState {
    /// Newest first.
    records: Vec<QuotationRecord>,
    offline: bool,
}

/// Thread-safe in-memory store. Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
    /// `None` for the whole store.
    owner_id: Option<String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A view over the same records, restricted to one owner.
    pub fn for_owner(&self, owner_id: impl Into<String>) -> Self {
        MemoryStore {
            state: Arc::clone(&self.state),
            owner_id: Some(owner_id.into()),
        }
    }

    fn visible(&self, record: &QuotationRecord) -> bool {
        self.owner_id
            .as_deref()
            .map_or(true, |owner| record.owner_id == owner)
    }

    fn check_owner(&self, record: &QuotationRecord) -> DbResult<()> {
        if !self.visible(record) {
            return Err(DbError::AccessDenied {
                quotation_number: record.quotation_number.clone(),
            });
        }
        Ok(())
    }

    /// When `true`, every operation fails as if storage were unreachable.
    pub fn set_offline(&self, offline: bool) {
        if let Ok(mut state) = self.state.write() {
            state.offline = offline;
        }
    }

    /// Number of records visible through this store.
    pub fn len(&self) -> usize {
        self.state
            .read()
            .map(|s| s.records.iter().filter(|r| self.visible(r)).count())
            .unwrap_or(0)
    }

    /// Checks if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut MemoryState) -> DbResult<T>) -> DbResult<T> {
        let mut state = self
            .state
            .write()
            .map_err(|_| DbError::Internal("memory store lock poisoned".to_string()))?;

        if state.offline {
            return Err(DbError::ConnectionFailed("memory store is offline".to_string()));
        }

        f(&mut state)
    }
}

#[async_trait]
impl QuotationStore for MemoryStore {
    async fn list(&self) -> DbResult<Vec<QuotationRecord>> {
        self.with_state(|state| {
            Ok(state
                .records
                .iter()
                .filter(|r| self.visible(r))
                .cloned()
                .collect())
        })
    }

    async fn create(&self, record: &QuotationRecord) -> DbResult<QuotationRecord> {
        self.check_owner(record)?;
        validate_record(record)?;

        self.with_state(|state| {
            if state
                .records
                .iter()
                .any(|r| r.quotation_number == record.quotation_number)
            {
                return Err(DbError::duplicate(
                    "quotations.quotation_number",
                    &record.quotation_number,
                ));
            }

            let now = Utc::now();
            let mut saved = record.clone();
            saved.id = Some(generate_quotation_id());
            saved.created_at = Some(now);
            saved.updated_at = Some(now);

            debug!(quotation_number = %saved.quotation_number, "Stored quotation in memory");
            state.records.insert(0, saved.clone());
            Ok(saved)
        })
    }

    async fn update(&self, id: &str, record: &QuotationRecord) -> DbResult<QuotationRecord> {
        self.check_owner(record)?;
        validate_record(record)?;

        self.with_state(|state| {
            let slot = state
                .records
                .iter_mut()
                .find(|r| r.id.as_deref() == Some(id) && self.visible(r))
                .ok_or_else(|| DbError::not_found("Quotation", id))?;

            let mut saved = record.clone();
            saved.id = slot.id.clone();
            saved.owner_id = slot.owner_id.clone();
            saved.quotation_number = slot.quotation_number.clone();
            saved.created_at = slot.created_at;
            saved.updated_at = Some(Utc::now());

            *slot = saved.clone();
            Ok(saved)
        })
    }

    async fn delete(&self, id: &str) -> DbResult<()> {
        self.with_state(|state| {
            let before = state.records.len();
            state
                .records
                .retain(|r| !(r.id.as_deref() == Some(id) && self.visible(r)));
            if state.records.len() == before {
                return Err(DbError::not_found("Quotation", id));
            }
            Ok(())
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use quote_core::{finalize, HeaderFields, QuotationForm, UserIdentity};

    fn record(client: &str) -> QuotationRecord {
        record_for("u1", client)
    }

    fn record_for(owner_id: &str, client: &str) -> QuotationRecord {
        let mut form = QuotationForm::new();
        form.client_name = client.to_string();
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let owner = UserIdentity {
            id: owner_id.to_string(),
            email: format!("{owner_id}@b.in"),
            full_name: None,
        };
        finalize(&form, &HeaderFields::new(today), None, &owner, today)
    }

    #[tokio::test]
    async fn test_create_list_newest_first() {
        let store = MemoryStore::new();
        store.create(&record("First")).await.unwrap();
        store.create(&record("Second")).await.unwrap();

        let list = store.list().await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].client_name, "Second");
        assert!(list.iter().all(|r| r.id.is_some()));
    }

    #[tokio::test]
    async fn test_update_keeps_identity() {
        let store = MemoryStore::new();
        let saved = store.create(&record("First")).await.unwrap();
        let id = saved.id.clone().unwrap();

        let mut changed = record("Renamed");
        changed.owner_id = "someone-else".to_string();
        let updated = store.update(&id, &changed).await.unwrap();

        assert_eq!(updated.id, saved.id);
        assert_eq!(updated.owner_id, "u1");
        assert_eq!(updated.quotation_number, saved.quotation_number);
        assert_eq!(updated.client_name, "Renamed");
    }

    #[tokio::test]
    async fn test_offline_fails_and_keeps_data() {
        let store = MemoryStore::new();
        let saved = store.create(&record("First")).await.unwrap();

        store.set_offline(true);
        assert!(matches!(
            store.delete(saved.id.as_deref().unwrap()).await,
            Err(DbError::ConnectionFailed(_))
        ));
        assert!(store.list().await.is_err());

        store.set_offline(false);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_id() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.delete("missing").await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_owner_views_are_isolated() {
        let store = MemoryStore::new();
        let alice = store.for_owner("alice");
        let bob = store.for_owner("bob");

        let hers = alice.create(&record_for("alice", "Alice's client")).await.unwrap();
        let her_id = hers.id.clone().unwrap();
        bob.create(&record_for("bob", "Bob's client")).await.unwrap();

        let seen: Vec<String> = bob.list().await.unwrap().into_iter().map(|r| r.client_name).collect();
        assert_eq!(seen, vec!["Bob's client".to_string()]);
        assert_eq!(alice.len(), 1);
        assert_eq!(store.len(), 2);

        assert!(matches!(
            bob.delete(&her_id).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            bob.update(&her_id, &record_for("bob", "Taken over")).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            bob.update(&her_id, &hers).await,
            Err(DbError::AccessDenied { .. })
        ));
        assert!(matches!(
            bob.create(&record_for("alice", "Planted")).await,
            Err(DbError::AccessDenied { .. })
        ));

        let still_hers = alice.list().await.unwrap();
        assert_eq!(still_hers.len(), 1);
        assert_eq!(still_hers[0].client_name, "Alice's client");
    }
}
