//! # Error Types
//!
//! Validation error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── ValidationError  - One field failing one rule                     │
//! │  └── FieldErrors      - Every failing field of a draft, by path        │
//! │                                                                         │
//! │  tally-store errors (separate crate)                                   │
//! │  └── StoreError       - Storage / persistence failures                 │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── CliError         - What the user sees                             │
//! │                                                                         │
//! │  Flow: ValidationError → FieldErrors → CliError → stderr               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. The `field` carried by each variant is the human label ("Quantity"),
//!    the map key in [`FieldErrors`] is the machine path ("items.0.qty")
//! 3. Errors are enum variants, never String

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// A single field failing a single rule.
///
/// The rendered messages are the ones the entry form shows under the field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field is empty, or a price was left at zero.
    #[error("{field} must be filled")]
    Required { field: String },

    /// A value that has no sensible default was not supplied at all.
    #[error("{field} is required")]
    Missing { field: String },

    /// Text is longer than the allowed number of characters.
    #[error("{field} must be {max} characters or less")]
    TooLong { field: String, max: usize },

    /// Numeric value is outside the inclusive range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: String, max: String },

    /// Value must be zero or more.
    #[error("{field} must be a non-negative number")]
    Negative { field: String },

    /// Date is earlier than the first accepted year.
    ///
    /// The wording is the entry form's own; `min_year` itself is accepted.
    #[error("{field} must be after {min_year}")]
    TooEarly { field: String, min_year: i32 },

    /// A list that needs at least one entry is empty.
    #[error("At least one {what} is required")]
    TooFew { what: String },
}

// =============================================================================
// Field Errors
// =============================================================================

/// Every failing field of a sale draft, keyed by field path.
///
/// ## Paths
/// Paths use the persisted (camelCase) field names, with list positions as
/// numeric segments:
/// ```text
/// invoiceCode
/// invoiceDate
/// items
/// items.0.productName
/// items.2.qty
/// discount
/// ```
///
/// Only the first failing rule is kept per path. Paths are ordered segment
/// by segment, numeric segments by value, so `items.2.qty` comes before
/// `items.10.qty`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{} field(s) failed validation", .errors.len())]
pub struct FieldErrors {
    errors: BTreeMap<FieldPath, ValidationError>,
}

/// A dotted field path with list positions compared as numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldPath(String);

impl Ord for FieldPath {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut left = self.0.split('.');
        let mut right = other.0.split('.');

        loop {
            let ordering = match (left.next(), right.next()) {
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some(a), Some(b)) => match (a.parse::<u64>(), b.parse::<u64>()) {
                    (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
                    _ => a.cmp(b),
                },
            };

            if ordering != Ordering::Equal {
                return ordering;
            }
        }
    }
}

impl PartialOrd for FieldPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FieldErrors {
    /// Creates an empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `error` for `path` unless that path already failed.
    pub fn insert(&mut self, path: impl Into<String>, error: ValidationError) {
        self.errors.entry(FieldPath(path.into())).or_insert(error);
    }

    /// Returns the error recorded for `path`, if any.
    pub fn get(&self, path: &str) -> Option<&ValidationError> {
        self.errors.get(&FieldPath(path.to_string()))
    }

    /// Returns true if `path` failed.
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterates `(path, error)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValidationError)> {
        self.errors.iter().map(|(path, err)| (path.0.as_str(), err))
    }

    /// Returns a `path → message` lookup for the presentation layer.
    pub fn messages(&self) -> BTreeMap<String, String> {
        self.iter()
            .map(|(path, err)| (path.to_string(), err.to_string()))
            .collect()
    }
}

/// Serializes as a flat `{ "path": "message" }` object.
impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for (path, err) in self.iter() {
            map.serialize_entry(path, &err.to_string())?;
        }
        map.end()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
