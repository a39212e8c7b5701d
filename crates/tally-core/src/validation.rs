//! # Validation Module
//!
//! Acceptance rules for sales and their items.
//!
//! ## Validation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SaleDraft (raw form input)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate() ← THIS MODULE                                               │
//! │       │                                                                 │
//! │       ├── any field fails? → Err(FieldErrors)  ── shown next to fields  │
//! │       │                                           store untouched       │
//! │       │                                                                 │
//! │       └── all pass         → Ok(Sale)          ── SalesStore::add/update│
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rules are per field. Nothing compares one field with another, so a
//! discount larger than the subtotal is accepted.
//!
//! ## Usage
//! ```rust
//! use tally_core::{validate, SaleDraft};
//!
//! let errors = validate(&SaleDraft::default()).unwrap_err();
//! assert!(errors.contains("invoiceCode"));
//! assert!(errors.contains("invoiceDate"));
//! assert!(errors.contains("items"));
//! ```

use chrono::{DateTime, Datelike, Utc};

use crate::error::{FieldErrors, ValidationError};
use crate::money::Money;
use crate::types::{Item, ItemDraft, Sale, SaleDraft};
use crate::{
    MAX_INVOICE_CODE_LEN, MAX_ITEM_PRICE, MAX_ITEM_QUANTITY, MAX_PRODUCT_NAME_LEN,
    MIN_INVOICE_YEAR, MIN_ITEM_PRICE,
};

/// Result type for single-field checks.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Sale Validation
// =============================================================================

/// Checks every field of `draft` and builds a [`Sale`] if all pass.
///
/// All failing fields are reported together, keyed by path
/// (`invoiceCode`, `items.1.price`, ...). Text fields are trimmed and the
/// invoice date is kept to millisecond precision, which is what the
/// persisted document can hold.
pub fn validate(draft: &SaleDraft) -> Result<Sale, FieldErrors> {
    let mut errors = FieldErrors::new();

    let invoice_code = check(&mut errors, "invoiceCode", validate_invoice_code(&draft.invoice_code));
    let invoice_date = check(&mut errors, "invoiceDate", validate_invoice_date(draft.invoice_date));

    if draft.items.is_empty() {
        errors.insert(
            "items",
            ValidationError::TooFew {
                what: "item".to_string(),
            },
        );
    }

    let items: Vec<Option<Item>> = draft
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| validate_item(&mut errors, index, item))
        .collect();

    let discount = check(&mut errors, "discount", validate_discount(draft.discount));

    match (invoice_code, invoice_date, discount) {
        (Some(invoice_code), Some(invoice_date), Some(discount)) if errors.is_empty() => {
            Ok(Sale {
                invoice_code,
                invoice_date,
                items: items.into_iter().flatten().collect(),
                discount,
            })
        }
        _ => Err(errors),
    }
}

fn check<T>(errors: &mut FieldErrors, path: &str, result: ValidationResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            errors.insert(path, err);
            None
        }
    }
}

fn validate_item(errors: &mut FieldErrors, index: usize, item: &ItemDraft) -> Option<Item> {
    let product_name = check(
        errors,
        &format!("items.{index}.productName"),
        validate_product_name(&item.product_name),
    );
    let qty = check(errors, &format!("items.{index}.qty"), validate_quantity(item.qty));
    let price = check(errors, &format!("items.{index}.price"), validate_price(item.price));

    Some(Item {
        product_name: product_name?,
        qty: qty?,
        price: price?,
    })
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates an invoice code and returns it trimmed.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 32 characters
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_invoice_code;
///
/// assert_eq!(validate_invoice_code(" TEST-001 ").unwrap(), "TEST-001");
/// assert!(validate_invoice_code("").is_err());
/// ```
pub fn validate_invoice_code(code: &str) -> ValidationResult<String> {
    validate_text(code, "Invoice code", MAX_INVOICE_CODE_LEN)
}

/// Validates a product name and returns it trimmed.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 32 characters
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    validate_text(name, "Product name", MAX_PRODUCT_NAME_LEN)
}

fn validate_text(text: &str, field: &str, max: usize) -> ValidationResult<String> {
    let text = text.trim();

    if text.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    // Characters, not bytes.
    if text.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(text.to_string())
}

/// Validates an invoice date.
///
/// ## Rules
/// - Must be present
/// - Calendar year (UTC) must be 2020 or later
pub fn validate_invoice_date(date: Option<DateTime<Utc>>) -> ValidationResult<DateTime<Utc>> {
    let date = date.ok_or_else(|| ValidationError::Missing {
        field: "Invoice date".to_string(),
    })?;

    if date.year() < MIN_INVOICE_YEAR {
        return Err(ValidationError::TooEarly {
            field: "Invoice date".to_string(),
            min_year: MIN_INVOICE_YEAR,
        });
    }

    Ok(DateTime::from_timestamp_millis(date.timestamp_millis()).unwrap_or(date))
}

/// Validates a line quantity.
///
/// ## Rules
/// - Between 1 and 1000 inclusive
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_quantity;
///
/// assert!(validate_quantity(1).is_ok());
/// assert!(validate_quantity(1000).is_ok());
/// assert!(validate_quantity(0).is_err());
/// assert!(validate_quantity(1001).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<i64> {
    if !(1..=MAX_ITEM_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "Quantity".to_string(),
            min: "1".to_string(),
            max: MAX_ITEM_QUANTITY.to_string(),
        });
    }

    Ok(qty)
}

/// Validates a unit price.
///
/// ## Rules
/// - At least 1 (a zero price reads as "not filled in")
/// - At most 1,000,000
pub fn validate_price(price: i64) -> ValidationResult<Money> {
    if price < MIN_ITEM_PRICE {
        return Err(ValidationError::Required {
            field: "Price".to_string(),
        });
    }

    if price > MAX_ITEM_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "Price".to_string(),
            min: with_commas(MIN_ITEM_PRICE),
            max: with_commas(MAX_ITEM_PRICE),
        });
    }

    Ok(Money::from_units(price))
}

/// Validates a flat discount.
///
/// ## Rules
/// - Zero or more; no upper bound, not compared with the subtotal
pub fn validate_discount(discount: i64) -> ValidationResult<Money> {
    if discount < 0 {
        return Err(ValidationError::Negative {
            field: "Discount".to_string(),
        });
    }

    Ok(Money::from_units(discount))
}

/// `1000000` → `"1,000,000"`, the grouping used in range messages.
fn with_commas(n: i64) -> String {
    Money::from_units(n).grouped().replace('.', ",")
}

// =============================================================================
// Unit Tests
// =============================================================================
