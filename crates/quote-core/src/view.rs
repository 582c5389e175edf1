//! # Formatted View Model
//!
//! A [`QuotationView`] is built once from a finalized record and handed to
//! every export adapter. All number and date formatting lives here, so the
//! PDF, the spreadsheet and the print page can never disagree.
//!
//! ## Formatting Rules
//! ```text
//! ┌───────────────────┬─────────────────────────────────────────────────────┐
//! │  Currency         │  Rs. 1,23,456.78   (Indian grouping, 2 dp)          │
//! │                   │  -Rs. 5.00         (sign before symbol)             │
//! │  Dates            │  05 March 2025                                      │
//! │  Dimensions       │  12.5              (as entered, trailing 0s cut)    │
//! │  Area             │  42.25             (round2, trailing 0s cut)        │
//! └───────────────────┴─────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{round2, Money};
use crate::types::QuotationRecord;

/// Currency prefix used when nothing is configured.
///
/// The PDF adapter uses the built-in Helvetica font, which has no glyph for
/// the rupee sign.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "Rs.";

// =============================================================================
// Company Profile
// =============================================================================

/// Letterhead printed at the top and bottom of every document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct CompanyProfile {
    /// Short name used in the letterhead and signature block.
    pub name: String,
    /// Name used in document titles.
    pub trade_name: String,
    pub address_lines: Vec<String>,
    /// Website, emails and phone numbers, one per line.
    pub contact_lines: Vec<String>,
    pub thank_you_note: String,
    pub footer_note: String,
    pub signatory_title: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: "Mabric".to_string(),
            trade_name: "Mabric Interio".to_string(),
            address_lines: vec![
                "Sy. No. 245/2, 1st Cross Rd,".to_string(),
                "Near Purvi Symphony Apartment,".to_string(),
                "Varthur, Bengaluru, Karnataka 560087".to_string(),
            ],
            contact_lines: vec![
                "www.mabric.in".to_string(),
                "hello@mabric.in".to_string(),
                "support@mabric.in".to_string(),
                "+91 96067 38877".to_string(),
                "+91 96067 48877".to_string(),
            ],
            thank_you_note: "Thank you for your business!".to_string(),
            footer_note: "For any queries, contact us at contact@mabric.in".to_string(),
            signatory_title: "Director".to_string(),
        }
    }
}

// =============================================================================
// View Types
// =============================================================================

/// Client block, blank fields already dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct ClientView {
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// One item row: display strings plus the raw values behind them.
///
/// The raw values let the spreadsheet write numeric cells without doing any
/// arithmetic of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct ItemRow {
    /// 1-based position.
    pub index: usize,
    pub particulars: String,
    pub length: String,
    pub width: String,
    pub area: String,
    pub price: String,
    pub amount: String,

    #[ts(as = "String")]
    pub length_value: Decimal,
    #[ts(as = "String")]
    pub width_value: Decimal,
    #[ts(as = "String")]
    pub area_value: Decimal,
    #[ts(as = "String")]
    pub price_value: Decimal,
    #[ts(as = "String")]
    pub amount_value: Decimal,
}

/// Everything an adapter needs to render a quotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct QuotationView {
    pub company: CompanyProfile,
    /// e.g. "Mabric Interio - Quotation"
    pub title: String,
    pub currency_symbol: String,

    pub quotation_number: String,
    pub date: String,
    pub valid_until: String,
    pub survey_number: Option<String>,
    pub project_name: Option<String>,
    pub house_number: Option<String>,

    pub client: ClientView,
    pub rows: Vec<ItemRow>,

    pub subtotal: String,
    pub tax_label: String,
    pub tax_amount: String,
    pub grand_total: String,

    #[ts(as = "String")]
    pub subtotal_value: Decimal,
    #[ts(as = "String")]
    pub tax_amount_value: Decimal,
    #[ts(as = "String")]
    pub grand_total_value: Decimal,

    pub terms: Option<String>,
}

impl QuotationView {
    /// Builds the view. Reads the record, never changes it.
    pub fn build(record: &QuotationRecord, company: &CompanyProfile, currency_symbol: &str) -> Self {
        let rows = record
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| ItemRow {
                index: i + 1,
                particulars: item.description.clone(),
                length: format_quantity(item.length),
                width: format_quantity(item.width),
                area: format_quantity(round2(item.area_total)),
                price: format_currency_decimal(item.price_per_area, currency_symbol),
                amount: format_currency(item.amount, currency_symbol),
                length_value: item.length,
                width_value: item.width,
                area_value: item.area_total,
                price_value: item.price_per_area,
                amount_value: item.amount.to_decimal(),
            })
            .collect();

        Self {
            company: company.clone(),
            title: format!("{} - Quotation", company.trade_name),
            currency_symbol: currency_symbol.to_string(),
            quotation_number: record.quotation_number.clone(),
            date: format_long_date(record.creation_date),
            valid_until: format_long_date(record.valid_until),
            survey_number: record.survey_number.clone(),
            project_name: record.project_name.clone(),
            house_number: record.house_number.clone(),
            client: ClientView {
                name: record.client_name.clone(),
                company: record.client_company.clone(),
                email: record.client_email.clone(),
                phone: record.client_phone.clone(),
                address: record.client_address.clone(),
            },
            rows,
            subtotal: format_currency(record.subtotal, currency_symbol),
            tax_label: format!("Tax ({}%)", record.tax_rate.percent()),
            tax_amount: format_currency(record.tax_amount, currency_symbol),
            grand_total: format_currency(record.grand_total, currency_symbol),
            subtotal_value: record.subtotal.to_decimal(),
            tax_amount_value: record.tax_amount.to_decimal(),
            grand_total_value: record.grand_total.to_decimal(),
            terms: record.terms.clone(),
        }
    }

    /// Client line as printed: `Name (Company)`.
    pub fn client_heading(&self) -> String {
        match &self.client.company {
            Some(company) => format!("{} ({})", self.client.name, company),
            None => self.client.name.clone(),
        }
    }
}

// =============================================================================
// Formatters
// =============================================================================

/// Formats money with the symbol and Indian digit grouping.
///
/// ## Example
/// ```rust
/// use quote_core::money::Money;
/// use quote_core::view::format_currency;
///
/// assert_eq!(format_currency(Money::from_minor(12345678), "Rs."), "Rs. 1,23,456.78");
/// assert_eq!(format_currency(Money::from_minor(-500), "Rs."), "-Rs. 5.00");
/// ```
pub fn format_currency(amount: Money, symbol: &str) -> String {
    format_currency_decimal(amount.to_decimal(), symbol)
}

/// Same as [`format_currency`] for a decimal value (rounded with `round2`).
pub fn format_currency_decimal(value: Decimal, symbol: &str) -> String {
    let rounded = round2(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let grouped = group_indian(whole);

    if symbol.is_empty() {
        format!("{sign}{grouped}.{fraction}")
    } else {
        format!("{sign}{symbol} {grouped}.{fraction}")
    }
}

/// Inserts separators the Indian way: last three digits, then pairs.
///
/// `1234567` → `12,34,567`
pub fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, right) = rest.split_at(rest.len() - 2);
        groups.push(right);
        rest = left;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// Long date: `05 March 2025`.
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%d %B %Y").to_string()
}

/// Plain number with trailing zeros removed (`12.50` → `12.5`).
pub fn format_quantity(value: Decimal) -> String {
    value.normalize().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finalize::finalize;
    use crate::types::{HeaderFields, LineItem, QuotationForm, UserIdentity};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn record() -> QuotationRecord {
        let mut form = QuotationForm::new();
        form.client_name = "Anita Shah".to_string();
        form.client_company = "Shah Builders".to_string();
        form.items = vec![
            LineItem::new("Wardrobe", dec("10"), dec("10"), dec("1")),
            LineItem::new("Loft", dec("5"), dec("50.10"), dec("1")),
        ];
        let header = HeaderFields::new(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap());
        let owner = UserIdentity {
            id: "u1".to_string(),
            email: "a@b.in".to_string(),
            full_name: None,
        };
        finalize(&form, &header, None, &owner, NaiveDate::from_ymd_opt(2025, 3, 5).unwrap())
    }

    #[test]
    fn test_group_indian() {
        assert_eq!(group_indian("0"), "0");
        assert_eq!(group_indian("999"), "999");
        assert_eq!(group_indian("1000"), "1,000");
        assert_eq!(group_indian("123456"), "1,23,456");
        assert_eq!(group_indian("1234567"), "12,34,567");
        assert_eq!(group_indian("123456789"), "12,34,56,789");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Money::from_minor(0), "Rs."), "Rs. 0.00");
        assert_eq!(format_currency(Money::from_minor(38555), "Rs."), "Rs. 385.55");
        assert_eq!(format_currency(Money::from_minor(10000000), "Rs."), "Rs. 1,00,000.00");
        assert_eq!(format_currency(Money::from_minor(-500), "Rs."), "-Rs. 5.00");
        assert_eq!(format_currency(Money::from_minor(150), ""), "1.50");
    }

    #[test]
    fn test_format_currency_decimal_rounds() {
        assert_eq!(format_currency_decimal(dec("1450.755"), "Rs."), "Rs. 1,450.76");
        assert_eq!(format_currency_decimal(dec("-0.001"), "Rs."), "Rs. 0.00");
    }

    #[test]
    fn test_format_long_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        assert_eq!(format_long_date(date), "05 March 2025");
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(dec("12.50")), "12.5");
        assert_eq!(format_quantity(dec("10")), "10");
        assert_eq!(format_quantity(dec("0.00")), "0");
    }

    #[test]
    fn test_build_view() {
        let record = record();
        let view = QuotationView::build(&record, &CompanyProfile::default(), DEFAULT_CURRENCY_SYMBOL);

        assert_eq!(view.title, "Mabric Interio - Quotation");
        assert_eq!(view.date, "05 March 2025");
        assert_eq!(view.valid_until, "20 March 2025");
        assert_eq!(view.client_heading(), "Anita Shah (Shah Builders)");
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[1].index, 2);
        assert_eq!(view.rows[1].width, "50.1");
        assert_eq!(view.rows[1].area, "250.5");
        assert_eq!(view.rows[1].amount, "Rs. 250.50");
        assert_eq!(view.rows[1].amount_value, dec("250.50"));
        assert_eq!(view.subtotal, "Rs. 350.50");
        assert_eq!(view.tax_label, "Tax (10%)");
        assert_eq!(view.tax_amount, "Rs. 35.05");
        assert_eq!(view.grand_total, "Rs. 385.55");
        assert!(view.survey_number.is_none());
    }

    #[test]
    fn test_build_view_does_not_touch_record() {
        let record = record();
        let before = record.clone();
        let _ = QuotationView::build(&record, &CompanyProfile::default(), "INR");
        assert_eq!(record, before);
    }
}
