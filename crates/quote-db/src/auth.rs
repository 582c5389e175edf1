//! # Local Authentication Provider
//!
//! [`AuthProvider`] over the `profiles` table.
//!
//! ## State
//! ```text
//! ┌──────────────┐  sign_up / sign_in ok   ┌─────────────────────────┐
//! │  signed out  │ ──────────────────────► │  signed in (identity)   │
//! │  current=None│ ◄────────────────────── │  current=Some(user)     │
//! └──────────────┘        sign_out         └─────────────────────────┘
//! ```
//! A failed sign-in leaves the current user unchanged.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::profile::ProfileRepository;
use crate::store::AuthProvider;
use quote_core::validation::{validate_email, validate_full_name, validate_password};
use quote_core::UserIdentity;

/// Email/password auth against local profiles.
#[derive(Debug, Clone)]
pub struct LocalAuth {
    profiles: ProfileRepository,
    current: Arc<RwLock<Option<UserIdentity>>>,
}

impl LocalAuth {
    /// Creates a signed-out provider.
    pub fn new(profiles: ProfileRepository) -> Self {
        LocalAuth {
            profiles,
            current: Arc::new(RwLock::new(None)),
        }
    }

    fn set_current(&self, user: Option<UserIdentity>) -> DbResult<()> {
        let mut current = self
            .current
            .write()
            .map_err(|_| DbError::Internal("auth state lock poisoned".to_string()))?;
        *current = user;
        Ok(())
    }
}

#[async_trait]
impl AuthProvider for LocalAuth {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> DbResult<UserIdentity> {
        validate_full_name(full_name)?;
        validate_email(email)?;
        validate_password(password)?;

        let user = self.profiles.create(email, password, Some(full_name)).await?;
        self.set_current(Some(user.clone()))?;

        info!(user_id = %user.id, "Signed up");
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> DbResult<UserIdentity> {
        validate_email(email)?;
        if password.is_empty() {
            return Err(quote_core::ValidationError::required("password").into());
        }

        let user = match self.profiles.verify(email, password).await {
            Ok(user) => user,
            Err(e) => {
                warn!("Sign-in rejected");
                return Err(e);
            }
        };
        self.set_current(Some(user.clone()))?;

        info!(user_id = %user.id, "Signed in");
        Ok(user)
    }

    async fn sign_out(&self) -> DbResult<()> {
        self.set_current(None)?;
        info!("Signed out");
        Ok(())
    }

    async fn current_user(&self) -> Option<UserIdentity> {
        self.current.read().ok().and_then(|user| user.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
