//! # Quotation Repository
//!
//! Database operations for quotations, scoped to a single owner.
//!
//! ## Row Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  quotations                                                             │
//! │  ├── id (UUID, PK)            assigned here on create                   │
//! │  ├── owner_id (FK profiles)   every query filters on it                 │
//! │  ├── quotation_number UNIQUE  collisions → DbError::UniqueViolation     │
//! │  ├── header / client columns  NULL when blank                           │
//! │  ├── items TEXT               JSON array of LineItem                    │
//! │  ├── *_minor INTEGER          Money in paise                            │
//! │  └── created_at / updated_at  set here                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::store::QuotationStore;
use quote_core::validation::validate_record;
use quote_core::{LineItem, Money, QuotationRecord, TaxRate, TAX_RATE};

const SELECT_COLUMNS: &str = r#"
    SELECT
        id, owner_id, quotation_number,
        survey_number, project_name, house_number, creation_date,
        client_name, client_company, client_address, client_email, client_phone, terms,
        items,
        subtotal_minor, tax_rate_bps, tax_amount_minor, grand_total_minor,
        valid_until, created_at, updated_at
    FROM quotations
"#;

// =============================================================================
// Row Mapping
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct QuotationRow {
    id: String,
    owner_id: String,
    quotation_number: String,
    survey_number: Option<String>,
    project_name: Option<String>,
    house_number: Option<String>,
    creation_date: NaiveDate,
    client_name: String,
    client_company: Option<String>,
    client_address: Option<String>,
    client_email: Option<String>,
    client_phone: Option<String>,
    terms: Option<String>,
    items: String,
    subtotal_minor: i64,
    tax_rate_bps: i64,
    tax_amount_minor: i64,
    grand_total_minor: i64,
    valid_until: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl QuotationRow {
    fn into_record(self) -> DbResult<QuotationRecord> {
        let items: Vec<LineItem> = serde_json::from_str(&self.items)?;
        let tax_rate = u32::try_from(self.tax_rate_bps)
            .map(TaxRate::from_bps)
            .unwrap_or(TAX_RATE);

        Ok(QuotationRecord {
            id: Some(self.id),
            owner_id: self.owner_id,
            quotation_number: self.quotation_number,
            survey_number: self.survey_number,
            project_name: self.project_name,
            house_number: self.house_number,
            creation_date: self.creation_date,
            client_name: self.client_name,
            client_company: self.client_company,
            client_address: self.client_address,
            client_email: self.client_email,
            client_phone: self.client_phone,
            terms: self.terms,
            items,
            subtotal: Money::from_minor(self.subtotal_minor),
            tax_rate,
            tax_amount: Money::from_minor(self.tax_amount_minor),
            grand_total: Money::from_minor(self.grand_total_minor),
            valid_until: self.valid_until,
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for one owner's quotations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.quotations_for(&user.id);
///
/// let saved = repo.create(&record).await?;
/// let all = repo.list().await?;
/// repo.delete(saved.id.as_deref().unwrap()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct QuotationRepository {
    pool: SqlitePool,
    owner_id: String,
}

impl QuotationRepository {
    /// Creates a repository that only sees rows owned by `owner_id`.
    pub fn new(pool: SqlitePool, owner_id: impl Into<String>) -> Self {
        QuotationRepository {
            pool,
            owner_id: owner_id.into(),
        }
    }

    /// The owner this repository is scoped to.
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// Lists the owner's quotations, newest first.
    pub async fn list(&self) -> DbResult<Vec<QuotationRecord>> {
        let sql = format!(
            "{SELECT_COLUMNS} WHERE owner_id = ?1 ORDER BY created_at DESC, rowid DESC"
        );
        let rows = sqlx::query_as::<_, QuotationRow>(&sql)
            .bind(&self.owner_id)
            .fetch_all(&self.pool)
            .await?;

        debug!(owner_id = %self.owner_id, count = rows.len(), "Listed quotations");
        rows.into_iter().map(QuotationRow::into_record).collect()
    }

    /// Gets a quotation by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(record))` - Found and owned by this owner
    /// * `Ok(None)` - Not found (or owned by someone else)
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<QuotationRecord>> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?1 AND owner_id = ?2");
        let row = sqlx::query_as::<_, QuotationRow>(&sql)
            .bind(id)
            .bind(&self.owner_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(QuotationRow::into_record).transpose()
    }

    /// Gets a quotation by its printed number.
    pub async fn find_by_number(&self, quotation_number: &str) -> DbResult<Option<QuotationRecord>> {
        let sql = format!("{SELECT_COLUMNS} WHERE quotation_number = ?1 AND owner_id = ?2");
        let row = sqlx::query_as::<_, QuotationRow>(&sql)
            .bind(quotation_number)
            .bind(&self.owner_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(QuotationRow::into_record).transpose()
    }

    /// Inserts a new quotation and returns it with its assigned ID.
    pub async fn create(&self, record: &QuotationRecord) -> DbResult<QuotationRecord> {
        self.check_owner(record)?;
        validate_record(record)?;

        let id = generate_quotation_id();
        let now = Utc::now();
        let items = serde_json::to_string(&record.items)?;

        debug!(id = %id, quotation_number = %record.quotation_number, "Inserting quotation");

        sqlx::query(
            r#"
            INSERT INTO quotations (
                id, owner_id, quotation_number,
                survey_number, project_name, house_number, creation_date,
                client_name, client_company, client_address, client_email, client_phone, terms,
                items,
                subtotal_minor, tax_rate_bps, tax_amount_minor, grand_total_minor,
                valid_until, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3,
                ?4, ?5, ?6, ?7,
                ?8, ?9, ?10, ?11, ?12, ?13,
                ?14,
                ?15, ?16, ?17, ?18,
                ?19, ?20, ?20
            )
            "#,
        )
        .bind(&id)
        .bind(&self.owner_id)
        .bind(&record.quotation_number)
        .bind(&record.survey_number)
        .bind(&record.project_name)
        .bind(&record.house_number)
        .bind(record.creation_date)
        .bind(&record.client_name)
        .bind(&record.client_company)
        .bind(&record.client_address)
        .bind(&record.client_email)
        .bind(&record.client_phone)
        .bind(&record.terms)
        .bind(&items)
        .bind(record.subtotal.minor())
        .bind(i64::from(record.tax_rate.bps()))
        .bind(record.tax_amount.minor())
        .bind(record.grand_total.minor())
        .bind(record.valid_until)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| with_number(e.into(), &record.quotation_number))?;

        info!(id = %id, quotation_number = %record.quotation_number, "Quotation created");

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| DbError::not_found("Quotation", &id))
    }

    /// Replaces the stored quotation with `record`.
    ///
    /// Identity columns (`id`, `owner_id`, `quotation_number`, `created_at`)
    /// are never rewritten.
    pub async fn update(&self, id: &str, record: &QuotationRecord) -> DbResult<QuotationRecord> {
        self.check_owner(record)?;
        validate_record(record)?;

        let now = Utc::now();
        let items = serde_json::to_string(&record.items)?;

        debug!(id = %id, "Updating quotation");

        let result = sqlx::query(
            r#"
            UPDATE quotations
            SET
                survey_number = ?3,
                project_name = ?4,
                house_number = ?5,
                creation_date = ?6,
                client_name = ?7,
                client_company = ?8,
                client_address = ?9,
                client_email = ?10,
                client_phone = ?11,
                terms = ?12,
                items = ?13,
                subtotal_minor = ?14,
                tax_rate_bps = ?15,
                tax_amount_minor = ?16,
                grand_total_minor = ?17,
                valid_until = ?18,
                updated_at = ?19
            WHERE id = ?1 AND owner_id = ?2
            "#,
        )
        .bind(id)
        .bind(&self.owner_id)
        .bind(&record.survey_number)
        .bind(&record.project_name)
        .bind(&record.house_number)
        .bind(record.creation_date)
        .bind(&record.client_name)
        .bind(&record.client_company)
        .bind(&record.client_address)
        .bind(&record.client_email)
        .bind(&record.client_phone)
        .bind(&record.terms)
        .bind(&items)
        .bind(record.subtotal.minor())
        .bind(i64::from(record.tax_rate.bps()))
        .bind(record.tax_amount.minor())
        .bind(record.grand_total.minor())
        .bind(record.valid_until)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Quotation", id));
        }

        info!(id = %id, "Quotation updated");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Quotation", id))
    }

    /// Deletes a quotation by ID.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting quotation");

        let result = sqlx::query("DELETE FROM quotations WHERE id = ?1 AND owner_id = ?2")
            .bind(id)
            .bind(&self.owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Quotation", id));
        }

        info!(id = %id, "Quotation deleted");
        Ok(())
    }

    /// Counts the owner's quotations (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotations WHERE owner_id = ?1")
            .bind(&self.owner_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    fn check_owner(&self, record: &QuotationRecord) -> DbResult<()> {
        if record.owner_id != self.owner_id {
            return Err(DbError::AccessDenied {
                quotation_number: record.quotation_number.clone(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl QuotationStore for QuotationRepository {
    async fn list(&self) -> DbResult<Vec<QuotationRecord>> {
        QuotationRepository::list(self).await
    }

    async fn create(&self, record: &QuotationRecord) -> DbResult<QuotationRecord> {
        QuotationRepository::create(self, record).await
    }

    async fn update(&self, id: &str, record: &QuotationRecord) -> DbResult<QuotationRecord> {
        QuotationRepository::update(self, id, record).await
    }

    async fn delete(&self, id: &str) -> DbResult<()> {
        QuotationRepository::delete(self, id).await
    }
}

/// Fills in the offending number on a quotation_number collision.
fn with_number(err: DbError, quotation_number: &str) -> DbError {
    match err {
        DbError::UniqueViolation { field, .. } => DbError::UniqueViolation {
            field,
            value: quotation_number.to_string(),
        },
        other => other,
    }
}

/// Helper to generate a new quotation ID.
pub fn generate_quotation_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use quote_core::{finalize, HeaderFields, ItemPatch, QuotationForm, UserIdentity};

    async fn setup() -> (Database, UserIdentity) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user = db
            .profiles()
            .create("owner@mabric.in", "secret1", Some("Owner"))
            .await
            .unwrap();
        (db, user)
    }

    fn record_for(user: &UserIdentity, client: &str) -> QuotationRecord {
        let mut form = QuotationForm::new();
        form.client_name = client.to_string();
        form.update_item(0, &ItemPatch::new().description("Wardrobe").length("10").width("8").price_per_area("1200"));
        let header = HeaderFields::new(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        finalize(&form, &header, None, user, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_round_trips() {
        let (db, user) = setup().await;
        let repo = db.quotations_for(&user.id);
        let record = record_for(&user, "Anita");

        let saved = repo.create(&record).await.unwrap();
        let id = saved.id.clone().unwrap();
        assert!(quote_core::validation::validate_uuid(&id).is_ok());
        assert!(saved.created_at.is_some());
        assert_eq!(saved.items, record.items);
        assert_eq!(saved.grand_total, record.grand_total);
        assert_eq!(saved.valid_until, record.valid_until);

        let found = repo.find_by_number(&record.quotation_number).await.unwrap();
        assert_eq!(found.unwrap().id.as_deref(), Some(id.as_str()));
    }

    #[tokio::test]
    async fn test_list_is_owner_scoped_and_newest_first() {
        let (db, user) = setup().await;
        let other = db
            .profiles()
            .create("other@mabric.in", "secret2", None)
            .await
            .unwrap();

        let repo = db.quotations_for(&user.id);
        repo.create(&record_for(&user, "First")).await.unwrap();
        repo.create(&record_for(&user, "Second")).await.unwrap();
        db.quotations_for(&other.id)
            .create(&record_for(&other, "Theirs"))
            .await
            .unwrap();

        let list = repo.list().await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].client_name, "Second");
        assert_eq!(list[1].client_name, "First");
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_preserves_identity() {
        let (db, user) = setup().await;
        let repo = db.quotations_for(&user.id);
        let saved = repo.create(&record_for(&user, "Anita")).await.unwrap();
        let id = saved.id.clone().unwrap();

        let mut changed = saved.clone();
        changed.client_name = "Anita Shah".to_string();
        changed.quotation_number = "QT-20990101-999999".to_string();

        let updated = repo.update(&id, &changed).await.unwrap();
        assert_eq!(updated.id, saved.id);
        assert_eq!(updated.client_name, "Anita Shah");
        assert_eq!(updated.quotation_number, saved.quotation_number);
        assert_eq!(updated.created_at, saved.created_at);
    }

    #[tokio::test]
    async fn test_other_owner_cannot_touch_rows() {
        let (db, user) = setup().await;
        let other = db
            .profiles()
            .create("other@mabric.in", "secret2", None)
            .await
            .unwrap();

        let saved = db
            .quotations_for(&user.id)
            .create(&record_for(&user, "Anita"))
            .await
            .unwrap();
        let id = saved.id.clone().unwrap();

        let theirs = db.quotations_for(&other.id);
        assert!(theirs.get_by_id(&id).await.unwrap().is_none());
        assert!(matches!(
            theirs.delete(&id).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            theirs.create(&saved).await,
            Err(DbError::AccessDenied { .. })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_number_is_rejected() {
        let (db, user) = setup().await;
        let repo = db.quotations_for(&user.id);
        let record = record_for(&user, "Anita");

        repo.create(&record).await.unwrap();
        match repo.create(&record).await {
            Err(DbError::UniqueViolation { value, .. }) => {
                assert_eq!(value, record.quotation_number)
            }
            other => panic!("expected UniqueViolation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_then_list() {
        let (db, user) = setup().await;
        let repo = db.quotations_for(&user.id);
        let saved = repo.create(&record_for(&user, "Anita")).await.unwrap();
        let id = saved.id.unwrap();

        repo.delete(&id).await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
        assert!(matches!(
            repo.delete(&id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_blank_client_name_is_rejected() {
        let (db, user) = setup().await;
        let repo = db.quotations_for(&user.id);
        let record = record_for(&user, "  ");

        assert!(matches!(
            repo.create(&record).await,
            Err(DbError::Validation(_))
        ));
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
