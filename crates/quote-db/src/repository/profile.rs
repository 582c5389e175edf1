//! # Profile Repository
//!
//! Local user profiles with argon2 password hashes.
//!
//! ## Password Storage
//! ```text
//! sign up:  password ──argon2 + random salt──► PHC string ──► profiles.password_hash
//! sign in:  password ──verify against PHC string──► ok / InvalidCredentials
//! ```
//!
//! Plain passwords never reach the database or the logs.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use quote_core::validation::{validate_email, validate_password};
use quote_core::UserIdentity;

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    id: String,
    email: String,
    full_name: Option<String>,
    password_hash: String,
}

impl ProfileRow {
    fn identity(&self) -> UserIdentity {
        UserIdentity {
            id: self.id.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
        }
    }
}

/// Repository for profile rows.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: SqlitePool,
}

impl ProfileRepository {
    /// Creates a new ProfileRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProfileRepository { pool }
    }

    /// Registers a profile.
    ///
    /// ## Errors
    /// * `DbError::Validation` - bad email or password shorter than 6
    /// * `DbError::UniqueViolation` - email already registered
    pub async fn create(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> DbResult<UserIdentity> {
        let email = email.trim();
        validate_email(email)?;
        validate_password(password)?;

        let id = Uuid::new_v4().to_string();
        let hash = hash_password(password)?;
        let full_name = full_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        let now = Utc::now();

        debug!(id = %id, "Inserting profile");

        sqlx::query(
            r#"
            INSERT INTO profiles (id, email, full_name, password_hash, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
        )
        .bind(&id)
        .bind(email)
        .bind(&full_name)
        .bind(&hash)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("email", email),
            other => other,
        })?;

        info!(id = %id, "Profile created");

        Ok(UserIdentity {
            id,
            email: email.to_string(),
            full_name,
        })
    }

    /// Checks an email/password pair.
    ///
    /// Unknown email and wrong password give the same error.
    pub async fn verify(&self, email: &str, password: &str) -> DbResult<UserIdentity> {
        let row = self.find_row_by_email(email.trim()).await?;

        match row {
            Some(row) if verify_password(password, &row.password_hash) => Ok(row.identity()),
            _ => Err(DbError::InvalidCredentials),
        }
    }

    /// Gets a profile by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<UserIdentity>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, email, full_name, password_hash
            FROM profiles
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(ProfileRow::identity))
    }

    /// Gets a profile by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<UserIdentity>> {
        let row = self.find_row_by_email(email.trim()).await?;
        Ok(row.as_ref().map(ProfileRow::identity))
    }

    async fn find_row_by_email(&self, email: &str) -> DbResult<Option<ProfileRow>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, email, full_name, password_hash
            FROM profiles
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Hash a password for storage.
fn hash_password(password: &str) -> DbResult<String> {
    use argon2::{
        password_hash::{rand_core::OsRng, SaltString},
        Argon2, PasswordHasher,
    };

    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbError::Internal(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Verify a password against its hash.
fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// =============================================================================
// Unit Tests
// =============================================================================
