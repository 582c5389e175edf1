//! # Domain Types
//!
//! Core domain types used throughout Mabric Quote.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ QuotationForm   │   │  HeaderFields   │   │ QuotationRecord │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  client_*       │ + │  survey/project │ ─►│  id (UUID)      │       │
//! │  │  items[]        │   │  date           │   │  quotation_no   │       │
//! │  │                 │   │  customer/mobile│   │  totals         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │           │                                    finalize() ▲             │
//! │           ▼                                                             │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    LineItem     │   │    ItemPatch    │   │    TaxRate      │       │
//! │  │  length × width │◄──│  partial edit   │   │  bps (u32)      │       │
//! │  │  × price_sqft   │   │  raw user input │   │  1000 = 10%     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! A quotation has:
//! - `id`: UUID v4 assigned by storage - immutable, used for updates/deletes
//! - `quotation_number`: `QT-YYYYMMDD-NNNNNN` - human-readable, printed on documents

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::compute;
use crate::money::Money;
use crate::numeric::{lenient_decimal, lenient_money, lenient_string, NumberInput};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1000 bps = 10% (the fixed quotation tax)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a whole percentage.
    #[inline]
    pub const fn from_percent(pct: u32) -> Self {
        TaxRate(pct * 100)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as an exact percentage (for display only).
    pub fn percent(&self) -> Decimal {
        Decimal::new(self.0 as i64, 2).normalize()
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        crate::TAX_RATE
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One row of quoted work.
///
/// `area_total` and `amount` are derived; build items with [`LineItem::new`]
/// or [`compute::recompute_item`] so they stay consistent with the inputs.
///
/// Field names on the wire follow the persisted item payload
/// (`particulars`, `total_sqft`, `price_sqft`). Deserialization is lenient:
/// missing or garbage numeric values load as zero.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Free-form description of the work.
    #[serde(rename = "particulars")]
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,

    #[serde(default, deserialize_with = "lenient_decimal")]
    #[ts(as = "String")]
    pub length: Decimal,

    #[serde(default, deserialize_with = "lenient_decimal")]
    #[ts(as = "String")]
    pub width: Decimal,

    /// `round2(length × width)`
    #[serde(rename = "total_sqft")]
    #[serde(default, deserialize_with = "lenient_decimal")]
    #[ts(as = "String")]
    pub area_total: Decimal,

    #[serde(rename = "price_sqft")]
    #[serde(default, deserialize_with = "lenient_decimal")]
    #[ts(as = "String")]
    pub price_per_area: Decimal,

    /// `round2(area_total × price_per_area)`, in minor units.
    #[serde(default, deserialize_with = "lenient_money")]
    pub amount: Money,
}

impl LineItem {
    /// Creates a fully derived item from its inputs.
    pub fn new(
        description: impl Into<String>,
        length: Decimal,
        width: Decimal,
        price_per_area: Decimal,
    ) -> Self {
        compute::recompute_item(
            &LineItem::default(),
            &ItemPatch {
                description: Some(description.into()),
                length: Some(length.into()),
                width: Some(width.into()),
                price_per_area: Some(price_per_area.into()),
            },
        )
    }

    /// True when nothing has been entered in the row.
    pub fn is_blank(&self) -> bool {
        self.description.trim().is_empty()
            && self.length.is_zero()
            && self.width.is_zero()
            && self.price_per_area.is_zero()
    }
}

// =============================================================================
// Item Patch
// =============================================================================

/// A partial update to one [`LineItem`], carrying raw user input.
///
/// `None` leaves the field as it is; `Some(NumberInput::Missing)` clears a
/// numeric field to zero.
///
/// ## Example
/// ```rust
/// use quote_core::types::{ItemPatch, LineItem};
/// use quote_core::compute::recompute_item;
///
/// let item = recompute_item(&LineItem::default(), &ItemPatch::new().length("12").width("10"));
/// assert_eq!(item.area_total.to_string(), "120");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(default, alias = "particulars")]
    pub description: Option<String>,
    #[serde(default)]
    pub length: Option<NumberInput>,
    #[serde(default)]
    pub width: Option<NumberInput>,
    #[serde(default, alias = "price_sqft")]
    pub price_per_area: Option<NumberInput>,
}

impl ItemPatch {
    /// An empty patch (recomputes derived fields only).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn length(mut self, length: impl Into<NumberInput>) -> Self {
        self.length = Some(length.into());
        self
    }

    pub fn width(mut self, width: impl Into<NumberInput>) -> Self {
        self.width = Some(width.into());
        self
    }

    pub fn price_per_area(mut self, price: impl Into<NumberInput>) -> Self {
        self.price_per_area = Some(price.into());
        self
    }

    /// Checks if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.length.is_none()
            && self.width.is_none()
            && self.price_per_area.is_none()
    }
}

// =============================================================================
// Quotation Form
// =============================================================================

/// The editable client block and item table.
///
/// ## Lifecycle
/// ```text
/// new() ──► add_item / update_item / remove_item ──► finalize()
///   ▲                                                    │
///   └──────────── from_record() (edit) ◄─────────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuotationForm {
    pub client_name: String,
    pub client_company: String,
    pub client_address: String,
    pub client_email: String,
    pub client_phone: String,
    pub terms: String,
    pub items: Vec<LineItem>,
}

impl Default for QuotationForm {
    fn default() -> Self {
        Self::new()
    }
}

impl QuotationForm {
    /// A blank form with one empty item row.
    pub fn new() -> Self {
        Self {
            client_name: String::new(),
            client_company: String::new(),
            client_address: String::new(),
            client_email: String::new(),
            client_phone: String::new(),
            terms: String::new(),
            items: vec![LineItem::default()],
        }
    }

    /// Prefills the form from a stored record (edit path).
    ///
    /// A record without items still gets one empty row to type into.
    pub fn from_record(record: &QuotationRecord) -> Self {
        let items = if record.items.is_empty() {
            vec![LineItem::default()]
        } else {
            record.items.clone()
        };

        Self {
            client_name: record.client_name.clone(),
            client_company: record.client_company.clone().unwrap_or_default(),
            client_address: record.client_address.clone().unwrap_or_default(),
            client_email: record.client_email.clone().unwrap_or_default(),
            client_phone: record.client_phone.clone().unwrap_or_default(),
            terms: record.terms.clone().unwrap_or_default(),
            items,
        }
    }

    /// Appends an empty item row.
    pub fn add_item(&mut self) {
        self.items.push(LineItem::default());
    }

    /// Appends an already built item.
    pub fn push_item(&mut self, item: LineItem) {
        self.items.push(item);
    }

    /// Removes the row at `index`. Returns `false` if out of range.
    ///
    /// Removing the last row is allowed; a form may finalize with no items.
    pub fn remove_item(&mut self, index: usize) -> bool {
        if index < self.items.len() {
            self.items.remove(index);
            true
        } else {
            false
        }
    }

    /// Applies a patch to the row at `index` and recomputes its derived
    /// fields. Returns `false` if out of range.
    pub fn update_item(&mut self, index: usize, patch: &ItemPatch) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                *item = compute::recompute_item(item, patch);
                true
            }
            None => false,
        }
    }

    /// Running subtotal shown under the item table.
    pub fn subtotal(&self) -> Money {
        compute::aggregate(&self.items).subtotal
    }
}

// =============================================================================
// Header Fields
// =============================================================================

/// The quick-entry header above the form.
///
/// `customer_name` and `mobile` override the client block's name and phone
/// when they are not blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HeaderFields {
    pub survey_number: String,
    pub project_name: String,
    pub house_number: String,
    /// Quotation date; the validity window starts here.
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub customer_name: String,
    pub mobile: String,
}

impl HeaderFields {
    /// Empty header dated `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            survey_number: String::new(),
            project_name: String::new(),
            house_number: String::new(),
            date: today,
            customer_name: String::new(),
            mobile: String::new(),
        }
    }

    /// Prefills the header from a stored record (edit path).
    pub fn from_record(record: &QuotationRecord) -> Self {
        Self {
            survey_number: record.survey_number.clone().unwrap_or_default(),
            project_name: record.project_name.clone().unwrap_or_default(),
            house_number: record.house_number.clone().unwrap_or_default(),
            date: record.creation_date,
            customer_name: record.client_name.clone(),
            mobile: record.client_phone.clone().unwrap_or_default(),
        }
    }
}

// =============================================================================
// User Identity
// =============================================================================

/// The authenticated user, as supplied by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserIdentity {
    /// Unique identifier (UUID v4).
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
}

impl UserIdentity {
    /// Name for greetings: full name when set, otherwise the email.
    pub fn display_name(&self) -> &str {
        match &self.full_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }
}

// =============================================================================
// Quotation Record
// =============================================================================

/// A finalized quotation, ready for storage or export.
///
/// Aggregates and `valid_until` are always produced by
/// [`crate::finalize::finalize`]; never edit them by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuotationRecord {
    /// Assigned by storage on create; `None` before the first save.
    #[serde(default)]
    pub id: Option<String>,

    /// User who created the record. Never changes.
    pub owner_id: String,

    /// `QT-YYYYMMDD-NNNNNN`, kept across edits.
    pub quotation_number: String,

    #[serde(default)]
    pub survey_number: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub house_number: Option<String>,

    #[ts(as = "String")]
    pub creation_date: NaiveDate,

    pub client_name: String,
    #[serde(default)]
    pub client_company: Option<String>,
    #[serde(default)]
    pub client_address: Option<String>,
    #[serde(default)]
    pub client_email: Option<String>,
    #[serde(default)]
    pub client_phone: Option<String>,

    /// Optional terms printed under the totals.
    #[serde(default)]
    pub terms: Option<String>,

    /// Display order is insertion order.
    #[serde(default)]
    pub items: Vec<LineItem>,

    pub subtotal: Money,
    pub tax_rate: TaxRate,
    pub tax_amount: Money,
    pub grand_total: Money,

    #[ts(as = "String")]
    pub valid_until: NaiveDate,

    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl QuotationRecord {
    /// Checks if storage has assigned an id.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Number of item rows.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
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

    #[test]
    fn test_tax_rate() {
        let rate = TaxRate::from_percent(10);
        assert_eq!(rate.bps(), 1000);
        assert_eq!(rate.percent().to_string(), "10");
        assert_eq!(TaxRate::default(), crate::TAX_RATE);
        assert!(TaxRate::zero().is_zero());
    }

    #[test]
    fn test_line_item_new_is_derived() {
        let item = LineItem::new("Wardrobe", dec("12"), dec("10"), dec("55.5"));
        assert_eq!(item.area_total, dec("120"));
        assert_eq!(item.amount.minor(), 666000);
    }

    #[test]
    fn test_line_item_wire_names() {
        let item = LineItem::new("Kitchen", dec("2"), dec("3"), dec("10"));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["particulars"], "Kitchen");
        assert_eq!(json["total_sqft"], "6");
        assert_eq!(json["price_sqft"], "10");
        assert_eq!(json["amount"], 6000);
    }

    #[test]
    fn test_line_item_binding_uses_wire_names() {
        let decl = LineItem::decl();
        assert!(decl.contains("particulars: string"), "{decl}");
        assert!(decl.contains("total_sqft: string"), "{decl}");
        assert!(decl.contains("price_sqft: string"), "{decl}");
        assert!(!decl.contains("price_per_area: string"), "{decl}");
    }

    #[test]
    fn test_line_item_lenient_load() {
        let item: LineItem =
            serde_json::from_str(r#"{"particulars": null, "length": "abc", "width": 4}"#).unwrap();
        assert_eq!(item.description, "");
        assert_eq!(item.length, Decimal::ZERO);
        assert_eq!(item.width, dec("4"));
        assert!(item.amount.is_zero());
    }

    #[test]
    fn test_form_item_management() {
        let mut form = QuotationForm::new();
        assert_eq!(form.items.len(), 1);

        form.add_item();
        assert_eq!(form.items.len(), 2);

        assert!(form.update_item(1, &ItemPatch::new().length(2).width(3).price_per_area(100)));
        assert_eq!(form.subtotal().minor(), 60000);

        assert!(!form.update_item(5, &ItemPatch::new().length(1)));
        assert!(form.remove_item(0));
        assert!(form.remove_item(0));
        assert!(form.items.is_empty());
        assert!(!form.remove_item(0));
    }

    #[test]
    fn test_item_patch_builder() {
        assert!(ItemPatch::new().is_empty());
        let patch = ItemPatch::new().description("Bed").length("12");
        assert_eq!(patch.description.as_deref(), Some("Bed"));
        assert_eq!(patch.length, Some(NumberInput::Text("12".to_string())));
        assert!(patch.width.is_none());
    }

    #[test]
    fn test_display_name() {
        let mut user = UserIdentity {
            id: "u1".to_string(),
            email: "a@b.com".to_string(),
            full_name: None,
        };
        assert_eq!(user.display_name(), "a@b.com");
        user.full_name = Some("Asha".to_string());
        assert_eq!(user.display_name(), "Asha");
    }
}
