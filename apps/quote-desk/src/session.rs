//! # Session Context
//!
//! Holds who is signed in and the quotations they can see. Passed explicitly
//! to every operation; nothing here is global.
//!
//! ## Session Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Operations                                   │
//! │                                                                         │
//! │  Action                Collaborator call          Local list change     │
//! │  ──────                ─────────────────          ─────────────────     │
//! │                                                                         │
//! │  sign_in / sign_up ──► auth + store.list() ─────► replaced             │
//! │                                                                         │
//! │  submit (new) ───────► store.create() ──────────► insert at front      │
//! │                                                                         │
//! │  submit (edit) ──────► store.update() ──────────► replaced in place    │
//! │                                                                         │
//! │  delete ─────────────► store.delete() ──────────► removed              │
//! │                                                                         │
//! │  reload ─────────────► store.list() ────────────► replaced             │
//! │                                                                         │
//! │  sign_out ───────────► auth.sign_out() ─────────► dropped              │
//! │                                                                         │
//! │  NOTE: the local list only changes after the collaborator succeeds.    │
//! │        A failed call leaves it exactly as it was.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use quote_core::validation::validate_client_name;
use quote_core::{finalize, CoreError, HeaderFields, QuotationForm, QuotationRecord, UserIdentity};
use quote_db::{AuthProvider, QuotationStore};

/// Opens the store for a signed-in user.
pub type StoreOpener<S> = Box<dyn Fn(&UserIdentity) -> S + Send + Sync>;

/// State that exists only while someone is signed in.
struct Active<S> {
    user: UserIdentity,
    store: S,
    /// Newest first, as returned by the store.
    records: Vec<QuotationRecord>,
}

/// The session context.
pub struct Session<S, A> {
    auth: A,
    open_store: StoreOpener<S>,
    active: Option<Active<S>>,
    clock: fn() -> NaiveDate,
}

fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

impl<S, A> Session<S, A>
where
    S: QuotationStore,
    A: AuthProvider,
{
    /// Creates a signed-out session.
    pub fn new(auth: A, open_store: impl Fn(&UserIdentity) -> S + Send + Sync + 'static) -> Self {
        Session {
            auth,
            open_store: Box::new(open_store),
            active: None,
            clock: utc_today,
        }
    }

    /// Replaces the clock used for minting quotation numbers.
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub async fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> AppResult<UserIdentity> {
        let user = self.auth.sign_up(email, password, full_name).await?;
        self.start(user.clone()).await?;
        Ok(user)
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> AppResult<UserIdentity> {
        let user = self.auth.sign_in(email, password).await?;
        self.start(user.clone()).await?;
        Ok(user)
    }

    pub async fn sign_out(&mut self) -> AppResult<()> {
        self.auth.sign_out().await?;
        if let Some(active) = self.active.take() {
            info!(user_id = %active.user.id, "Session closed");
        }
        Ok(())
    }

    /// Opens the user's store and loads their list. If the list cannot be
    /// loaded the provider is signed out again, so no half-open session remains.
    async fn start(&mut self, user: UserIdentity) -> AppResult<()> {
        self.active = None;
        let store = (self.open_store)(&user);
        let records = match store.list().await {
            Ok(records) => records,
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "Could not load quotations, signing out");
                if let Err(sign_out) = self.auth.sign_out().await {
                    warn!(error = %sign_out, "Sign-out after failed start also failed");
                }
                return Err(e.into());
            }
        };

        info!(user_id = %user.id, quotations = records.len(), "Session started");
        self.active = Some(Active {
            user,
            store,
            records,
        });
        Ok(())
    }

    pub fn current_user(&self) -> Option<&UserIdentity> {
        self.active.as_ref().map(|a| &a.user)
    }

    pub fn is_signed_in(&self) -> bool {
        self.active.is_some()
    }

    // =========================================================================
    // Local List
    // =========================================================================

    /// The local quotation list, newest first. Empty when signed out.
    pub fn records(&self) -> &[QuotationRecord] {
        self.active.as_ref().map(|a| a.records.as_slice()).unwrap_or(&[])
    }

    pub fn find_by_number(&self, quotation_number: &str) -> Option<&QuotationRecord> {
        self.records()
            .iter()
            .find(|r| r.quotation_number == quotation_number)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&QuotationRecord> {
        self.records().iter().find(|r| r.id.as_deref() == Some(id))
    }

    /// Replaces the local list with what the store returns.
    pub async fn reload(&mut self) -> AppResult<()> {
        let active = self.active_mut()?;
        let records = active.store.list().await?;
        debug!(quotations = records.len(), "Reloaded quotations");
        active.records = records;
        Ok(())
    }

    // =========================================================================
    // Preview / Submit / Delete
    // =========================================================================

    /// Builds the record that `submit` would save, without saving it.
    ///
    /// A new quotation gets a freshly minted number on every preview.
    pub fn preview(
        &self,
        form: &QuotationForm,
        header: &HeaderFields,
        editing: Option<&str>,
    ) -> AppResult<QuotationRecord> {
        let active = self.active()?;
        let prior = self.prior(active, editing)?;
        Ok(finalize(form, header, prior, &active.user, self.today()))
    }

    /// Validates, finalizes and saves. Returns the stored record.
    ///
    /// `editing` is the id of the record being edited; `None` creates a new
    /// quotation. On any failure the local list is left unchanged.
    pub async fn submit(
        &mut self,
        form: &QuotationForm,
        header: &HeaderFields,
        editing: Option<&str>,
    ) -> AppResult<QuotationRecord> {
        let record = self.preview(form, header, editing)?;
        validate_client_name(&record.client_name)?;

        let active = self.active_mut()?;
        let result = match editing {
            Some(id) => active.store.update(id, &record).await,
            None => active.store.create(&record).await,
        };

        let saved = match result {
            Ok(saved) => saved,
            Err(e) => {
                warn!(
                    quotation_number = %record.quotation_number,
                    error = %e,
                    "Saving quotation failed"
                );
                return Err(e.into());
            }
        };

        match editing {
            Some(id) => {
                if let Some(slot) = active
                    .records
                    .iter_mut()
                    .find(|r| r.id.as_deref() == Some(id))
                {
                    *slot = saved.clone();
                }
                info!(quotation_number = %saved.quotation_number, "Quotation updated");
            }
            None => {
                active.records.insert(0, saved.clone());
                info!(quotation_number = %saved.quotation_number, "Quotation created");
            }
        }

        Ok(saved)
    }

    /// Deletes by id, then drops the record from the local list.
    pub async fn delete(&mut self, id: &str) -> AppResult<()> {
        let active = self.active_mut()?;

        if let Err(e) = active.store.delete(id).await {
            warn!(id = %id, error = %e, "Deleting quotation failed");
            return Err(e.into());
        }

        active.records.retain(|r| r.id.as_deref() != Some(id));
        info!(id = %id, "Quotation deleted");
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn active(&self) -> AppResult<&Active<S>> {
        self.active
            .as_ref()
            .ok_or_else(|| CoreError::NotSignedIn.into())
    }

    fn active_mut(&mut self) -> AppResult<&mut Active<S>> {
        self.active
            .as_mut()
            .ok_or_else(|| CoreError::NotSignedIn.into())
    }

    fn prior<'a>(
        &self,
        active: &'a Active<S>,
        editing: Option<&str>,
    ) -> AppResult<Option<&'a QuotationRecord>> {
        let Some(id) = editing else {
            return Ok(None);
        };

        let prior = active
            .records
            .iter()
            .find(|r| r.id.as_deref() == Some(id))
            .ok_or_else(|| AppError::from(CoreError::QuotationNotFound(id.to_string())))?;

        if prior.owner_id != active.user.id {
            return Err(CoreError::OwnerMismatch {
                quotation_number: prior.quotation_number.clone(),
            }
            .into());
        }

        Ok(Some(prior))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
