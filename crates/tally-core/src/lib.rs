//! # tally-core: Pure Business Logic for the Tally Sales Ledger
//!
//! This crate holds the sale data model, the validation rules a sale must
//! pass before it is stored, and the arithmetic behind every total the
//! ledger shows. Everything here is a pure function of its inputs.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    tally (CLI front end)                        │   │
//! │  │      list ──► add ──► edit ──► show ──► delete                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  totals   │  │ validation│  │   │
//! │  │   │   Sale    │  │   Money   │  │ subtotal  │  │ validate  │  │   │
//! │  │   │   Item    │  │ mask_num  │  │ grand tot │  │FieldErrors│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 tally-store (Persistence Layer)                 │   │
//! │  │           SalesStore, SQLite / JSON file / memory backends      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Sale, Item, drafts, persisted document)
//! - [`money`] - Money type over whole currency units
//! - [`totals`] - Subtotal and grand total computation
//! - [`validation`] - Sale and item acceptance rules
//! - [`error`] - Validation error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use tally_core::{validate, ItemDraft, Money, SaleDraft};
//!
//! let draft = SaleDraft {
//!     invoice_code: "TEST-001".to_string(),
//!     invoice_date: Some(Utc.with_ymd_and_hms(2025, 4, 15, 0, 0, 0).unwrap()),
//!     items: vec![ItemDraft::new("Test Product", 5, 100)],
//!     discount: 0,
//! };
//!
//! let sale = validate(&draft).unwrap();
//! assert_eq!(sale.grand_total(), Money::from_units(500));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{FieldErrors, ValidationError};
pub use money::{mask_number, Money};
pub use totals::{compute_grand_total, compute_subtotal, LineAmount, SaleTotals};
pub use types::*;
pub use validation::validate;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of an invoice code, in characters.
pub const MAX_INVOICE_CODE_LEN: usize = 32;

/// Maximum length of a product name, in characters.
pub const MAX_PRODUCT_NAME_LEN: usize = 32;

/// Maximum quantity of a single line item.
pub const MAX_ITEM_QUANTITY: i64 = 1000;

/// Lowest accepted unit price.
pub const MIN_ITEM_PRICE: i64 = 1;

/// Highest accepted unit price.
pub const MAX_ITEM_PRICE: i64 = 1_000_000;

/// Earliest calendar year an invoice may be dated in.
///
/// ## Business Reason
/// The ledger was started in 2020; anything older is a typo in the date
/// picker, not a real invoice.
pub const MIN_INVOICE_YEAR: i32 = 2020;
