//! # Computation Engine
//!
//! Keeps derived numeric fields consistent with their inputs.
//!
//! ## Derivation Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  per item                                                               │
//! │    length × width            ──round2──►  area_total                    │
//! │    area_total × price_sqft   ──round2──►  amount                        │
//! │                                                                         │
//! │  per quotation                                                          │
//! │    Σ amount                  ──────────►  subtotal                      │
//! │    subtotal × 10%            ──round2──►  tax_amount                    │
//! │    subtotal + tax_amount     ──────────►  grand_total                   │
//! │                                                                         │
//! │    date + 15 calendar days   ──────────►  valid_until                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here fails. Bad input is coerced to zero by [`crate::numeric`];
//! a product that overflows `Decimal` is logged and treated as zero.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use ts_rs::TS;

use crate::money::{round2, Money};
use crate::types::{ItemPatch, LineItem};
use crate::{TAX_RATE, VALIDITY_DAYS};

// =============================================================================
// Item Recompute
// =============================================================================

/// Applies `patch` to `item` and recomputes its derived fields.
///
/// Fields the patch leaves as `None` keep their current value. The result is
/// always fully consistent, and applying the same patch again yields the
/// same item.
///
/// ## Example
/// ```rust
/// use quote_core::compute::recompute_item;
/// use quote_core::types::{ItemPatch, LineItem};
///
/// let item = recompute_item(
///     &LineItem::default(),
///     &ItemPatch::new().description("False ceiling").length("10.5").width("4").price_per_area("85"),
/// );
/// assert_eq!(item.area_total.to_string(), "42.0");
/// assert_eq!(item.amount.to_string(), "3570.00");
/// ```
pub fn recompute_item(item: &LineItem, patch: &ItemPatch) -> LineItem {
    let description = patch
        .description
        .clone()
        .unwrap_or_else(|| item.description.clone());
    let length = patch
        .length
        .as_ref()
        .map_or(item.length, |n| n.to_decimal());
    let width = patch.width.as_ref().map_or(item.width, |n| n.to_decimal());
    let price_per_area = patch
        .price_per_area
        .as_ref()
        .map_or(item.price_per_area, |n| n.to_decimal());

    let area_total = round2(checked_product(length, width));
    let amount = Money::from_decimal(checked_product(area_total, price_per_area));

    LineItem {
        description,
        length,
        width,
        area_total,
        price_per_area,
        amount,
    }
}

fn checked_product(a: Decimal, b: Decimal) -> Decimal {
    match a.checked_mul(b) {
        Some(product) => product,
        None => {
            warn!(%a, %b, "Decimal overflow in item computation, using 0");
            Decimal::ZERO
        }
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Document-level totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Totals {
    pub subtotal: Money,
    pub tax_amount: Money,
    pub grand_total: Money,
}

/// Sums item amounts and applies the fixed 10% tax.
///
/// Amounts are already rounded minor units, so the subtotal needs no further
/// rounding; tax rounds half away from zero.
pub fn aggregate(items: &[LineItem]) -> Totals {
    let subtotal: Money = items.iter().map(|item| item.amount).sum();
    let tax_amount = subtotal.calculate_tax(TAX_RATE);
    let grand_total = subtotal + tax_amount;

    Totals {
        subtotal,
        tax_amount,
        grand_total,
    }
}

// =============================================================================
// Validity Window
// =============================================================================

/// Adds exactly 15 calendar days.
///
/// Saturates at `NaiveDate::MAX` for dates at the very end of chrono's range.
pub fn compute_valid_until(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(VALIDITY_DAYS))
        .unwrap_or(NaiveDate::MAX)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn item_with_amount(minor: i64) -> LineItem {
        LineItem {
            amount: Money::from_minor(minor),
            ..LineItem::default()
        }
    }

    #[test]
    fn test_recompute_derives_area_and_amount() {
        let item = recompute_item(
            &LineItem::default(),
            &ItemPatch::new().length("3.333").width("3").price_per_area("10"),
        );
        // 9.999 → 10.00, then × 10
        assert_eq!(item.area_total, dec("10.00"));
        assert_eq!(item.amount.minor(), 10000);
    }

    #[test]
    fn test_recompute_rounds_half_away_from_zero() {
        let item = recompute_item(
            &LineItem::default(),
            &ItemPatch::new().length("1.01").width("1.5").price_per_area("1"),
        );
        // 1.515 → 1.52
        assert_eq!(item.area_total, dec("1.52"));
        assert_eq!(item.amount.minor(), 152);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let patch = ItemPatch::new()
            .description("TV unit")
            .length("7.25")
            .width("2.125")
            .price_per_area("1450.75");
        let once = recompute_item(&LineItem::default(), &patch);
        let twice = recompute_item(&once, &patch);
        assert_eq!(once, twice);

        let empty_again = recompute_item(&once, &ItemPatch::new());
        assert_eq!(once, empty_again);
    }

    #[test]
    fn test_recompute_keeps_unpatched_fields() {
        let base = LineItem::new("Shelf", dec("4"), dec("2"), dec("100"));
        let item = recompute_item(&base, &ItemPatch::new().width("3"));
        assert_eq!(item.description, "Shelf");
        assert_eq!(item.length, dec("4"));
        assert_eq!(item.area_total, dec("12"));
        assert_eq!(item.amount.minor(), 120000);
    }

    #[test]
    fn test_recompute_coerces_bad_input() {
        let base = LineItem::new("Shelf", dec("4"), dec("2"), dec("100"));
        let item = recompute_item(&base, &ItemPatch::new().length("abc"));
        assert_eq!(item.length, Decimal::ZERO);
        assert_eq!(item.area_total, Decimal::ZERO);
        assert!(item.amount.is_zero());

        let item = recompute_item(&base, &ItemPatch::new().price_per_area(f64::NAN));
        assert!(item.amount.is_zero());
    }

    #[test]
    fn test_recompute_accepts_negative_input() {
        let item = recompute_item(
            &LineItem::default(),
            &ItemPatch::new().length("-2").width("3").price_per_area("10"),
        );
        assert_eq!(item.area_total, dec("-6"));
        assert_eq!(item.amount.minor(), -6000);
    }

    #[test]
    fn test_recompute_overflow_is_zero() {
        let huge = Decimal::MAX.to_string();
        let item = recompute_item(
            &LineItem::default(),
            &ItemPatch::new().length(huge.as_str()).width(huge.as_str()),
        );
        assert_eq!(item.area_total, Decimal::ZERO);
    }

    #[test]
    fn test_aggregate_reference_amounts() {
        let items = vec![item_with_amount(10000), item_with_amount(25050)];
        let totals = aggregate(&items);
        assert_eq!(totals.subtotal.to_string(), "350.50");
        assert_eq!(totals.tax_amount.to_string(), "35.05");
        assert_eq!(totals.grand_total.to_string(), "385.55");
    }

    #[test]
    fn test_aggregate_empty() {
        let totals = aggregate(&[]);
        assert!(totals.subtotal.is_zero());
        assert!(totals.tax_amount.is_zero());
        assert!(totals.grand_total.is_zero());
    }

    #[test]
    fn test_aggregate_tax_rounding() {
        // 0.15 × 10% = 0.015 → 0.02
        let totals = aggregate(&[item_with_amount(15)]);
        assert_eq!(totals.tax_amount.minor(), 2);
        assert_eq!(totals.grand_total.minor(), 17);
    }

    #[test]
    fn test_valid_until_crosses_month() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(
            compute_valid_until(date),
            NaiveDate::from_ymd_opt(2025, 1, 16).unwrap()
        );

        let date = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();
        assert_eq!(
            compute_valid_until(date),
            NaiveDate::from_ymd_opt(2024, 3, 6).unwrap()
        );

        let date = NaiveDate::from_ymd_opt(2025, 12, 25).unwrap();
        assert_eq!(
            compute_valid_until(date),
            NaiveDate::from_ymd_opt(2026, 1, 9).unwrap()
        );
    }

    #[test]
    fn test_valid_until_saturates() {
        assert_eq!(compute_valid_until(NaiveDate::MAX), NaiveDate::MAX);
    }
}
