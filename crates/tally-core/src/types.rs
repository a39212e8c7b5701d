//! # Domain Types
//!
//! Core domain types used throughout Tally.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Unchecked input (form)             Checked record (store)              │
//! │  ┌─────────────────┐                ┌─────────────────┐                 │
//! │  │   SaleDraft     │   validate()   │      Sale       │                 │
//! │  │  invoice_code   │ ─────────────► │  invoice_code   │                 │
//! │  │  invoice_date?  │                │  invoice_date   │                 │
//! │  │  items: Vec<ItemDraft>           │  items: Vec<Item>                 │
//! │  │  discount: i64  │                │  discount: Money│                 │
//! │  └─────────────────┘                └────────┬────────┘                 │
//! │                                              │                          │
//! │                                   ┌──────────▼──────────┐               │
//! │                                   │   SalesDocument     │               │
//! │                                   │  version, sales[]   │ ─► storage    │
//! │                                   └─────────────────────┘               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Neither a sale nor an item carries an id. A sale is addressed by its
//! position in the collection, an item by its position in the sale.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::totals::{compute_grand_total, compute_subtotal, SaleTotals};

/// Version written into every persisted [`SalesDocument`].
pub const DOCUMENT_VERSION: u32 = 1;

// =============================================================================
// Item
// =============================================================================

/// One validated line of a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Item {
    /// Product name, 1..=32 characters.
    pub product_name: String,

    /// Quantity sold, 1..=1000.
    pub qty: i64,

    /// Unit price, 1..=1,000,000.
    pub price: Money,
}

impl Item {
    /// Returns `qty * price`.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.qty)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// One validated invoice.
///
/// Only [`crate::validate`] should build these from user input; the store
/// accepts a `Sale` on the understanding that it already passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    pub invoice_code: String,

    /// Persisted as epoch milliseconds.
    #[serde(with = "invoice_date")]
    #[ts(type = "number")]
    pub invoice_date: DateTime<Utc>,

    /// At least one item.
    pub items: Vec<Item>,

    /// Flat amount taken off the subtotal.
    pub discount: Money,
}

impl Sale {
    /// Returns the sum of all line totals.
    pub fn subtotal(&self) -> Money {
        compute_subtotal(&self.items)
    }

    /// Returns the subtotal minus the discount. May be negative.
    pub fn grand_total(&self) -> Money {
        compute_grand_total(&self.items, self.discount)
    }

    /// Returns every derived figure the detail view shows.
    pub fn totals(&self) -> SaleTotals {
        SaleTotals::of(&self.items, self.discount)
    }

    /// Returns a draft pre-filled with this sale, for editing.
    pub fn to_draft(&self) -> SaleDraft {
        SaleDraft {
            invoice_code: self.invoice_code.clone(),
            invoice_date: Some(self.invoice_date),
            items: self
                .items
                .iter()
                .map(|item| ItemDraft {
                    product_name: item.product_name.clone(),
                    qty: item.qty,
                    price: item.price.units(),
                })
                .collect(),
            discount: self.discount.units(),
        }
    }
}

// =============================================================================
// Drafts
// =============================================================================

/// An item as typed into the entry form, not yet checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct ItemDraft {
    pub product_name: String,
    pub qty: i64,
    pub price: i64,
}

impl ItemDraft {
    pub fn new(product_name: impl Into<String>, qty: i64, price: i64) -> Self {
        ItemDraft {
            product_name: product_name.into(),
            qty,
            price,
        }
    }
}

/// A sale as typed into the entry form, not yet checked.
///
/// Every field defaults when absent so that an incomplete form still
/// deserializes and reports its gaps through validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct SaleDraft {
    pub invoice_code: String,

    #[serde(with = "invoice_date::option")]
    #[ts(type = "number | null")]
    pub invoice_date: Option<DateTime<Utc>>,

    pub items: Vec<ItemDraft>,

    pub discount: i64,
}

impl SaleDraft {
    /// Returns the running grand total the entry form shows while typing.
    pub fn grand_total(&self) -> Money {
        compute_grand_total(&self.items, Money::from_units(self.discount))
    }
}

// =============================================================================
// Persisted Document
// =============================================================================

/// The single JSON document the store persists.
///
/// ## Layout
/// ```json
/// { "version": 1,
///   "sales": [ { "invoiceCode": "INV-1", "invoiceDate": 1744675200000,
///                "items": [ { "productName": "Tea", "qty": 2, "price": 5000 } ],
///                "discount": 0 } ] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesDocument {
    pub version: u32,
    pub sales: Vec<Sale>,
}

impl SalesDocument {
    pub fn new(sales: Vec<Sale>) -> Self {
        SalesDocument {
            version: DOCUMENT_VERSION,
            sales,
        }
    }

    /// Parses a persisted document.
    ///
    /// Besides the current layout this accepts the browser export envelope
    /// `{ "state": { "sales": [...] }, "version": 0 }`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let sales = parse_any_document::<Sale>(json)?;
        Ok(SalesDocument::new(sales))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Parses a document of unchecked sales, for importing.
///
/// Accepts the same layouts as [`SalesDocument::from_json`]; each entry is
/// read leniently as a [`SaleDraft`] so it can go through validation.
pub fn parse_draft_document(json: &str) -> Result<Vec<SaleDraft>, serde_json::Error> {
    parse_any_document::<SaleDraft>(json)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AnyDocument<S> {
    Current {
        sales: Vec<S>,
    },
    Envelope {
        state: EnvelopeState<S>,
    },
}

#[derive(Deserialize)]
struct EnvelopeState<S> {
    sales: Vec<S>,
}

fn parse_any_document<S>(json: &str) -> Result<Vec<S>, serde_json::Error>
where
    S: for<'de> Deserialize<'de>,
{
    let doc: AnyDocument<S> = serde_json::from_str(json)?;
    Ok(match doc {
        AnyDocument::Current { sales } => sales,
        AnyDocument::Envelope { state } => state.sales,
    })
}

// =============================================================================
// Invoice Dates
// =============================================================================

/// Parses a date typed by a user or found in an older document.
///
/// ## Accepted Forms
/// - RFC 3339 / ISO 8601 timestamp: `2025-04-15T08:30:00Z`
/// - Calendar date, taken as midnight UTC: `2025-04-15`
pub fn parse_invoice_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Serde adapter: written as epoch millis, read from millis or a date string.
pub(crate) mod invoice_date {
    use chrono::{DateTime, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Fractional(f64),
        Text(String),
    }

    fn from_raw<E: Error>(raw: Raw) -> Result<DateTime<Utc>, E> {
        let parsed = match raw {
            Raw::Millis(ms) => DateTime::from_timestamp_millis(ms),
            Raw::Fractional(ms) => DateTime::from_timestamp_millis(ms as i64),
            Raw::Text(ref text) => super::parse_invoice_date(text),
        };
        parsed.ok_or_else(|| E::custom("invoiceDate is not a valid date"))
    }

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(date.timestamp_millis())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        from_raw(Raw::deserialize(d)?)
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            date: &Option<DateTime<Utc>>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => s.serialize_i64(date.timestamp_millis()),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            Option::<Raw>::deserialize(d)?.map(from_raw).transpose()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
