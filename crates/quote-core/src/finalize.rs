//! # Record Finalizer
//!
//! Turns the live form state into a [`QuotationRecord`] at submit or preview
//! time.
//!
//! ## Finalize Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  QuotationForm + HeaderFields (+ prior record when editing)             │
//! │         │                                                               │
//! │         ├── identity ── prior? ──yes──► reuse id / owner / number       │
//! │         │                  └────no───► mint QT-<today>-<6 digits>       │
//! │         │                                                               │
//! │         ├── header/client ── header quick field non-blank? use it       │
//! │         │                    otherwise the client block value           │
//! │         │                                                               │
//! │         ├── items ── recompute_item(item, empty patch) each             │
//! │         ├── totals ── aggregate(items)                                  │
//! │         └── valid_until ── header.date + 15 days                        │
//! │                                                                         │
//! │         ▼                                                               │
//! │  QuotationRecord                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stored aggregates on a prior record are never reused.

use chrono::{NaiveDate, Utc};
use rand::Rng;
use tracing::debug;

use crate::compute::{aggregate, compute_valid_until, recompute_item};
use crate::types::{HeaderFields, ItemPatch, QuotationForm, QuotationRecord, UserIdentity};
use crate::TAX_RATE;

// =============================================================================
// Quotation Numbers
// =============================================================================

/// Mints `QT-<YYYYMMDD>-<NNNNNN>` using the thread-local RNG.
///
/// Uniqueness is advisory; storage enforces it.
pub fn mint_quotation_number(today: NaiveDate) -> String {
    mint_quotation_number_with(today, &mut rand::thread_rng())
}

/// Mints a quotation number with a caller-supplied RNG (seeded in tests).
pub fn mint_quotation_number_with<R: Rng + ?Sized>(today: NaiveDate, rng: &mut R) -> String {
    let suffix: u32 = rng.gen_range(0..1_000_000);
    format!("QT-{}-{:06}", today.format("%Y%m%d"), suffix)
}

// =============================================================================
// Finalize
// =============================================================================

/// Builds a finalized record from form state.
///
/// ## Arguments
/// * `form` - client block and item rows
/// * `header` - quick header fields and the quotation date
/// * `prior` - the record being edited, if any
/// * `owner` - the signed-in user (ignored on the edit path)
/// * `today` - processing date, used only when minting a new number
pub fn finalize(
    form: &QuotationForm,
    header: &HeaderFields,
    prior: Option<&QuotationRecord>,
    owner: &UserIdentity,
    today: NaiveDate,
) -> QuotationRecord {
    finalize_with_rng(form, header, prior, owner, today, &mut rand::thread_rng())
}

/// [`finalize`] with the processing date taken from the UTC clock.
pub fn finalize_now(
    form: &QuotationForm,
    header: &HeaderFields,
    prior: Option<&QuotationRecord>,
    owner: &UserIdentity,
) -> QuotationRecord {
    finalize(form, header, prior, owner, Utc::now().date_naive())
}

/// [`finalize`] with a caller-supplied RNG for the number suffix.
pub fn finalize_with_rng<R: Rng + ?Sized>(
    form: &QuotationForm,
    header: &HeaderFields,
    prior: Option<&QuotationRecord>,
    owner: &UserIdentity,
    today: NaiveDate,
    rng: &mut R,
) -> QuotationRecord {
    let (id, owner_id, quotation_number, created_at, updated_at) = match prior {
        Some(p) => (
            p.id.clone(),
            p.owner_id.clone(),
            p.quotation_number.clone(),
            p.created_at,
            p.updated_at,
        ),
        None => (
            None,
            owner.id.clone(),
            mint_quotation_number_with(today, rng),
            None,
            None,
        ),
    };

    let empty = ItemPatch::new();
    let items: Vec<_> = form
        .items
        .iter()
        .map(|item| recompute_item(item, &empty))
        .collect();
    let totals = aggregate(&items);

    debug!(
        quotation_number = %quotation_number,
        items = items.len(),
        grand_total = %totals.grand_total,
        editing = prior.is_some(),
        "Finalized quotation"
    );

    QuotationRecord {
        id,
        owner_id,
        quotation_number,
        survey_number: non_blank(&header.survey_number),
        project_name: non_blank(&header.project_name),
        house_number: non_blank(&header.house_number),
        creation_date: header.date,
        client_name: prefer(&header.customer_name, &form.client_name),
        client_company: non_blank(&form.client_company),
        client_address: non_blank(&form.client_address),
        client_email: non_blank(&form.client_email),
        client_phone: non_blank(&prefer(&header.mobile, &form.client_phone)),
        terms: non_blank(&form.terms),
        items,
        subtotal: totals.subtotal,
        tax_rate: TAX_RATE,
        tax_amount: totals.tax_amount,
        grand_total: totals.grand_total,
        valid_until: compute_valid_until(header.date),
        created_at,
        updated_at,
    }
}

/// Trimmed value, or `None` when blank.
fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// The override when it has content, otherwise the fallback (both trimmed).
fn prefer(override_value: &str, fallback: &str) -> String {
    match override_value.trim() {
        "" => fallback.trim().to_string(),
        v => v.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::LineItem;
    use crate::validation::validate_quotation_number;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn owner() -> UserIdentity {
        UserIdentity {
            id: "user-1".to_string(),
            email: "owner@mabric.in".to_string(),
            full_name: Some("Owner".to_string()),
        }
    }

    fn form_with_items() -> QuotationForm {
        let mut form = QuotationForm::new();
        form.client_name = "Detailed Name".to_string();
        form.client_phone = "11111".to_string();
        form.items = vec![
            LineItem::new("Wardrobe", Decimal::new(10, 0), Decimal::new(10, 0), Decimal::ONE),
            LineItem::new("Loft", Decimal::new(5, 0), Decimal::new(501, 1), Decimal::ONE),
        ];
        form
    }

    #[test]
    fn test_new_record_mints_number() {
        let header = HeaderFields::new(date(2025, 3, 5));
        let record = finalize(&form_with_items(), &header, None, &owner(), date(2025, 1, 1));

        assert!(record.id.is_none());
        assert_eq!(record.owner_id, "user-1");
        assert!(record.quotation_number.starts_with("QT-20250101-"));
        assert!(validate_quotation_number(&record.quotation_number).is_ok());
        assert_eq!(record.tax_rate, TAX_RATE);
    }

    #[test]
    fn test_totals_are_recomputed() {
        let mut form = form_with_items();
        // Stale amount that disagrees with the inputs
        form.items[0].amount = Money::from_minor(1);

        let header = HeaderFields::new(date(2025, 1, 1));
        let record = finalize(&form, &header, None, &owner(), date(2025, 1, 1));

        // 100.00 + 250.50
        assert_eq!(record.items[0].amount.minor(), 10000);
        assert_eq!(record.subtotal.to_string(), "350.50");
        assert_eq!(record.tax_amount.to_string(), "35.05");
        assert_eq!(record.grand_total.to_string(), "385.55");
        assert_eq!(record.valid_until, date(2025, 1, 16));
    }

    #[test]
    fn test_edit_path_preserves_identity() {
        let header = HeaderFields::new(date(2025, 1, 1));
        let mut prior = finalize(&form_with_items(), &header, None, &owner(), date(2025, 1, 1));
        prior.id = Some("abc".to_string());
        prior.quotation_number = "QT-20250101-000123".to_string();
        prior.grand_total = Money::from_minor(999_999);

        let mut form = QuotationForm::from_record(&prior);
        form.client_name = "Someone Else".to_string();
        form.items.clear();

        let mut header = HeaderFields::from_record(&prior);
        header.customer_name.clear();
        header.date = date(2025, 6, 30);

        let other_user = UserIdentity {
            id: "user-2".to_string(),
            ..owner()
        };
        let record = finalize(&form, &header, Some(&prior), &other_user, date(2026, 2, 2));

        assert_eq!(record.id.as_deref(), Some("abc"));
        assert_eq!(record.quotation_number, "QT-20250101-000123");
        assert_eq!(record.owner_id, "user-1");
        assert_eq!(record.client_name, "Someone Else");
        assert!(record.grand_total.is_zero());
        assert_eq!(record.valid_until, date(2025, 7, 15));
    }

    #[test]
    fn test_header_overrides_only_when_non_blank() {
        let form = form_with_items();

        let mut header = HeaderFields::new(date(2025, 1, 1));
        let record = finalize(&form, &header, None, &owner(), date(2025, 1, 1));
        assert_eq!(record.client_name, "Detailed Name");
        assert_eq!(record.client_phone.as_deref(), Some("11111"));

        header.customer_name = "Quick Name".to_string();
        header.mobile = "99999".to_string();
        let record = finalize(&form, &header, None, &owner(), date(2025, 1, 1));
        assert_eq!(record.client_name, "Quick Name");
        assert_eq!(record.client_phone.as_deref(), Some("99999"));
    }

    #[test]
    fn test_blank_optional_fields_become_none() {
        let mut form = form_with_items();
        form.client_company = "   ".to_string();
        let mut header = HeaderFields::new(date(2025, 1, 1));
        header.project_name = "Villa 7".to_string();

        let record = finalize(&form, &header, None, &owner(), date(2025, 1, 1));
        assert!(record.client_company.is_none());
        assert!(record.survey_number.is_none());
        assert_eq!(record.project_name.as_deref(), Some("Villa 7"));
    }

    #[test]
    fn test_zero_items_finalize_to_zero() {
        let mut form = QuotationForm::new();
        form.client_name = "Empty".to_string();
        form.items.clear();

        let header = HeaderFields::new(date(2025, 1, 1));
        let record = finalize(&form, &header, None, &owner(), date(2025, 1, 1));
        assert!(record.items.is_empty());
        assert!(record.subtotal.is_zero());
        assert!(record.tax_amount.is_zero());
        assert!(record.grand_total.is_zero());
    }

    #[test]
    fn test_identical_inputs_identical_output_with_same_rng() {
        let form = form_with_items();
        let header = HeaderFields::new(date(2025, 1, 1));

        let a = finalize_with_rng(
            &form,
            &header,
            None,
            &owner(),
            date(2025, 1, 1),
            &mut StdRng::seed_from_u64(7),
        );
        let b = finalize_with_rng(
            &form,
            &header,
            None,
            &owner(),
            date(2025, 1, 1),
            &mut StdRng::seed_from_u64(7),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_minted_numbers_differ() {
        let mut rng = StdRng::seed_from_u64(42);
        let numbers: std::collections::HashSet<String> = (0..50)
            .map(|_| mint_quotation_number_with(date(2025, 1, 1), &mut rng))
            .collect();
        assert!(numbers.len() > 45);
        assert!(numbers.iter().all(|n| validate_quotation_number(n).is_ok()));
    }
}
