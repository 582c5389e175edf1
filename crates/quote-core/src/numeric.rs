//! # Numeric Input Coercion
//!
//! Form fields arrive as whatever the user typed. This module turns them into
//! exact decimals without ever failing.
//!
//! ## Coercion Table
//! ```text
//! ┌──────────────────────────┬──────────────────────────────────────────────┐
//! │  Input                   │  Result                                      │
//! ├──────────────────────────┼──────────────────────────────────────────────┤
//! │  12.5 (number)           │  12.5                                        │
//! │  "12.5", " 12.5 "        │  12.5                                        │
//! │  "1e3"                   │  1000                                        │
//! │  "", "   ", null, absent │  0                                           │
//! │  "abc", "12abc"          │  0                                           │
//! │  NaN, ±Infinity          │  0                                           │
//! │  out of Decimal range    │  0                                           │
//! └──────────────────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! The serde helpers at the bottom apply the same table to persisted item
//! payloads, so a row saved by an older client with `"length": "abc"` still
//! loads.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::money::Money;

// =============================================================================
// NumberInput
// =============================================================================

/// A raw numeric field value as entered by the user.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    /// A JSON number or a value already parsed by the caller.
    Number(f64),
    /// Free text from an input box.
    Text(String),
    /// Absent or null.
    #[default]
    Missing,
}

impl NumberInput {
    /// Coerces the input to a decimal. Never fails; see the module table.
    pub fn to_decimal(&self) -> Decimal {
        match self {
            NumberInput::Number(n) => decimal_from_f64(*n),
            NumberInput::Text(s) => parse_decimal_lenient(s),
            NumberInput::Missing => Decimal::ZERO,
        }
    }
}

impl From<f64> for NumberInput {
    fn from(n: f64) -> Self {
        NumberInput::Number(n)
    }
}

impl From<i64> for NumberInput {
    fn from(n: i64) -> Self {
        NumberInput::Text(n.to_string())
    }
}

impl From<i32> for NumberInput {
    fn from(n: i32) -> Self {
        NumberInput::Text(n.to_string())
    }
}

impl From<Decimal> for NumberInput {
    fn from(d: Decimal) -> Self {
        NumberInput::Text(d.to_string())
    }
}

impl From<&str> for NumberInput {
    fn from(s: &str) -> Self {
        NumberInput::Text(s.to_string())
    }
}

impl From<String> for NumberInput {
    fn from(s: String) -> Self {
        NumberInput::Text(s)
    }
}

impl<T: Into<NumberInput>> From<Option<T>> for NumberInput {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(NumberInput::Missing)
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses free text into a decimal, returning zero for anything unusable.
pub fn parse_decimal_lenient(text: &str) -> Decimal {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }

    if let Ok(d) = Decimal::from_str(trimmed) {
        return d;
    }

    if let Ok(d) = Decimal::from_scientific(trimmed) {
        return d;
    }

    // Last resort: anything f64 understands ("1E3", ".5e1", "+7")
    match trimmed.parse::<f64>() {
        Ok(n) => decimal_from_f64(n),
        Err(_) => Decimal::ZERO,
    }
}

/// Converts an f64 through its shortest decimal representation, so that
/// `0.1` becomes exactly `0.1` rather than the nearest binary value.
pub fn decimal_from_f64(n: f64) -> Decimal {
    if !n.is_finite() {
        return Decimal::ZERO;
    }

    let text = n.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .unwrap_or(Decimal::ZERO)
}

// =============================================================================
// Lenient Serde Helpers
// =============================================================================

fn value_to_decimal(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => parse_decimal_lenient(&n.to_string()),
        Value::String(s) => parse_decimal_lenient(s),
        _ => Decimal::ZERO,
    }
}

/// `deserialize_with` helper: any JSON value → Decimal, unusable → 0.
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_decimal(&value))
}

/// `deserialize_with` helper for amounts stored in minor units.
///
/// Integers are taken as minor units; fractional numbers and text are
/// rounded half away from zero to the nearest minor unit.
pub fn lenient_money<'de, D>(deserializer: D) -> Result<Money, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if let Some(minor) = value.as_i64() {
        return Ok(Money::from_minor(minor));
    }

    let minor = value_to_decimal(&value);
    Ok(Money::from_decimal(minor / Decimal::ONE_HUNDRED))
}

/// `deserialize_with` helper: strings pass through, null/other → "".
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
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
    fn test_text_coercion() {
        assert_eq!(NumberInput::from("12.5").to_decimal(), dec("12.5"));
        assert_eq!(NumberInput::from("  12.5 ").to_decimal(), dec("12.5"));
        assert_eq!(NumberInput::from("-3").to_decimal(), dec("-3"));
        assert_eq!(NumberInput::from("1e3").to_decimal(), dec("1000"));
    }

    #[test]
    fn test_bad_input_becomes_zero() {
        assert_eq!(NumberInput::from("").to_decimal(), Decimal::ZERO);
        assert_eq!(NumberInput::from("   ").to_decimal(), Decimal::ZERO);
        assert_eq!(NumberInput::from("abc").to_decimal(), Decimal::ZERO);
        assert_eq!(NumberInput::from("12abc").to_decimal(), Decimal::ZERO);
        assert_eq!(NumberInput::Missing.to_decimal(), Decimal::ZERO);
        assert_eq!(NumberInput::from(f64::NAN).to_decimal(), Decimal::ZERO);
        assert_eq!(NumberInput::from(f64::INFINITY).to_decimal(), Decimal::ZERO);
        assert_eq!(NumberInput::from(1e300).to_decimal(), Decimal::ZERO);
    }

    #[test]
    fn test_f64_goes_through_shortest_repr() {
        assert_eq!(NumberInput::from(0.1).to_decimal(), dec("0.1"));
        assert_eq!(NumberInput::from(250.5).to_decimal(), dec("250.5"));
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(NumberInput::from(None::<f64>), NumberInput::Missing);
        assert_eq!(NumberInput::from(Some(2.0)), NumberInput::Number(2.0));
    }

    #[test]
    fn test_untagged_deserialize() {
        let n: NumberInput = serde_json::from_str("12.5").unwrap();
        assert_eq!(n, NumberInput::Number(12.5));

        let t: NumberInput = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(t, NumberInput::Text("7".to_string()));

        let m: NumberInput = serde_json::from_str("null").unwrap();
        assert_eq!(m, NumberInput::Missing);
    }

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "lenient_decimal")]
        value: Decimal,
        #[serde(default, deserialize_with = "lenient_money")]
        amount: Money,
        #[serde(default, deserialize_with = "lenient_string")]
        label: String,
    }

    #[test]
    fn test_lenient_helpers() {
        let p: Probe =
            serde_json::from_str(r#"{"value": "abc", "amount": 12345, "label": null}"#).unwrap();
        assert_eq!(p.value, Decimal::ZERO);
        assert_eq!(p.amount.minor(), 12345);
        assert_eq!(p.label, "");

        let p: Probe = serde_json::from_str(r#"{"value": 4.25, "amount": "250.6"}"#).unwrap();
        assert_eq!(p.value, dec("4.25"));
        assert_eq!(p.amount.minor(), 251);

        let p: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(p.value, Decimal::ZERO);
        assert!(p.amount.is_zero());
    }
}
