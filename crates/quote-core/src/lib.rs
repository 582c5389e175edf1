//! # quote-core: Pure Business Logic for Mabric Quote
//!
//! This crate is the **heart** of Mabric Quote. It contains all quotation
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mabric Quote Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    quote-desk (Session + CLI)                   │   │
//! │  │    sign in ──► edit form ──► preview / submit ──► export       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ quote-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  compute  │  │ finalize  │  │   view    │  │   │
//! │  │   │ LineItem  │  │ recompute │  │ QT-number │  │ Rs. 1,234 │  │   │
//! │  │   │  Record   │  │ aggregate │  │  record   │  │ 05 March  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO FILES • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                  │                                   │                  │
//! │  ┌───────────────▼──────────────┐   ┌────────────────▼──────────────┐  │
//! │  │  quote-db (SQLite, auth)     │   │  quote-export (PDF/XLSX/HTML) │  │
//! │  └──────────────────────────────┘   └───────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (LineItem, QuotationRecord, form state)
//! - [`money`] - Money type with integer arithmetic and the rounding policy
//! - [`numeric`] - Lenient coercion of user-typed numbers
//! - [`compute`] - Item recompute, totals, validity window
//! - [`finalize`] - Form state → finalized record
//! - [`view`] - The formatted view model shared by all exporters
//! - [`error`] - Domain error types
//! - [`validation`] - Boundary checks
//!
//! ## Example Usage
//!
//! ```rust
//! use quote_core::compute::{aggregate, recompute_item};
//! use quote_core::types::{ItemPatch, LineItem};
//!
//! let item = recompute_item(
//!     &LineItem::default(),
//!     &ItemPatch::new().length("12").width("10").price_per_area("85.50"),
//! );
//! let totals = aggregate(&[item]);
//!
//! assert_eq!(totals.subtotal.to_string(), "10260.00");
//! assert_eq!(totals.tax_amount.to_string(), "1026.00");
//! assert_eq!(totals.grand_total.to_string(), "11286.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod compute;
pub mod error;
pub mod finalize;
pub mod money;
pub mod numeric;
pub mod types;
pub mod validation;
pub mod view;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use compute::{aggregate, compute_valid_until, recompute_item, Totals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use finalize::{finalize, finalize_now, mint_quotation_number};
pub use money::{round2, Money};
pub use numeric::NumberInput;
pub use types::*;
pub use view::{CompanyProfile, QuotationView};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Tax applied to every quotation: 10%.
///
/// Fixed; there is no per-record or per-client rate.
pub const TAX_RATE: TaxRate = TaxRate::from_bps(1000);

/// Days a quotation stays valid after its date.
pub const VALIDITY_DAYS: u64 = 15;
