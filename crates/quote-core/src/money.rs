//! # Money Module
//!
//! Provides the `Money` type and the crate-wide rounding policy.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │    (12.345).toFixed(2) = "12.35"? "12.34"? depends on the binary value  │
//! │                                                                         │
//! │  OUR SOLUTION                                                           │
//! │    Dimensions / rates  → rust_decimal::Decimal (exact base-10)          │
//! │    Money               → i64 minor units (paise)                        │
//! │    Rounding            → half away from zero, 2 dp, in ONE place        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use quote_core::money::Money;
//! use rust_decimal::Decimal;
//!
//! let amount = Money::from_decimal(Decimal::new(250505, 3)); // 250.505
//! assert_eq!(amount.minor(), 25051); // rounds half away from zero
//! assert_eq!(amount.to_string(), "250.51");
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Rounding Policy
// =============================================================================

/// Rounds to 2 decimal places, half away from zero.
///
/// Every derived area and monetary value goes through this function, which
/// keeps recomputation idempotent: `round2(round2(x)) == round2(x)`.
///
/// ## Example
/// ```rust
/// use quote_core::money::round2;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round2(Decimal::new(1005, 3)), Decimal::new(101, 2));   // 1.005 → 1.01
/// assert_eq!(round2(Decimal::new(-1005, 3)), Decimal::new(-101, 2)); // -1.005 → -1.01
/// ```
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in minor currency units (paise for INR).
///
/// ## Where Money is Used
/// ```text
/// LineItem.amount ──► Σ ──► subtotal ──► calculate_tax(10%) ──► tax_amount
///                             │                                    │
///                             └──────────────► + ◄─────────────────┘
///                                              │
///                                              ▼
///                                         grand_total
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from a decimal amount in major units, applying
    /// [`round2`] first.
    ///
    /// Values that do not fit in `i64` minor units saturate.
    pub fn from_decimal(value: Decimal) -> Self {
        let minor = round2(value)
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|scaled| scaled.to_i64());

        match minor {
            Some(m) => Money(m),
            None if value.is_sign_negative() => Money(i64::MIN),
            None => Money(i64::MAX),
        }
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the value as an exact decimal in major units (2 dp).
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.saturating_abs())
    }

    /// Calculates tax, rounding half away from zero to the nearest minor unit.
    ///
    /// ## Implementation
    /// Integer math on basis points: `amount × bps / 10000`, with ±5000
    /// added before the truncating division depending on sign.
    ///
    /// ## Example
    /// ```rust
    /// use quote_core::money::Money;
    /// use quote_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_minor(35050); // 350.50
    /// let tax = subtotal.calculate_tax(TaxRate::from_percent(10));
    /// assert_eq!(tax.minor(), 3505); // 35.05
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 prevents overflow on large amounts
        let product = self.0 as i128 * rate.bps() as i128;
        let rounded = if product >= 0 {
            (product + 5000) / 10000
        } else {
            (product - 5000) / 10000
        };
        Money(rounded.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain two-decimal rendering ("1234.50", "-5.00").
///
/// Grouping and currency symbols belong to [`crate::view`].
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}{}.{:02}",
            sign,
            (self.0 / 100).unsigned_abs(),
            self.minor_part()
        )
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
