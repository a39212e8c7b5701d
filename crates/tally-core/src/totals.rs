//! # Totals
//!
//! The arithmetic behind every total the ledger shows.
//!
//! ## Where Totals Are Used
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Entry form (live, over drafts)  ──┐                                    │
//! │  List view (grand total column)  ──┼──► compute_subtotal                │
//! │  Detail view (subtotal/discount) ──┘    compute_grand_total             │
//! │                                                                         │
//! │  subtotal    = Σ qty × price                                            │
//! │  grand total = subtotal − discount      (no floor at zero)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Totals are never stored. They are recomputed from the items every time,
//! so an edited sale can't carry a stale total.

use serde::Serialize;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Item, ItemDraft};

// =============================================================================
// Line Amount
// =============================================================================

/// Anything that contributes `qty × price` to a subtotal.
///
/// Implemented for validated [`Item`]s and for [`ItemDraft`]s, so the running
/// total in the entry form uses the same arithmetic as the detail view.
pub trait LineAmount {
    fn line_amount(&self) -> Money;
}

impl LineAmount for Item {
    #[inline]
    fn line_amount(&self) -> Money {
        self.line_total()
    }
}

impl LineAmount for ItemDraft {
    #[inline]
    fn line_amount(&self) -> Money {
        Money::from_units(self.price).multiply_quantity(self.qty)
    }
}

// =============================================================================
// Computation
// =============================================================================

/// Sums `qty × price` over `items`.
///
/// An empty slice yields zero.
///
/// ## Example
/// ```rust
/// use tally_core::{compute_subtotal, ItemDraft, Money};
///
/// let items = [ItemDraft::new("Tea", 5, 100), ItemDraft::new("Cake", 2, 200)];
/// assert_eq!(compute_subtotal(&items), Money::from_units(900));
/// assert_eq!(compute_subtotal::<ItemDraft>(&[]), Money::zero());
/// ```
pub fn compute_subtotal<L: LineAmount>(items: &[L]) -> Money {
    items.iter().map(LineAmount::line_amount).sum()
}

/// Returns the subtotal of `items` minus `discount`.
///
/// The result is negative when the discount exceeds the subtotal; that is a
/// valid total and is shown as such.
pub fn compute_grand_total<L: LineAmount>(items: &[L], discount: Money) -> Money {
    compute_subtotal(items) - discount
}

// =============================================================================
// Sale Totals
// =============================================================================

/// The three figures shown at the foot of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleTotals {
    pub subtotal: Money,
    pub discount: Money,
    pub grand_total: Money,
}

impl SaleTotals {
    pub fn of<L: LineAmount>(items: &[L], discount: Money) -> Self {
        let subtotal = compute_subtotal(items);
        SaleTotals {
            subtotal,
            discount,
            grand_total: subtotal - discount,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(qty: i64, price: i64) -> Item {
        Item {
            product_name: "Test Product".to_string(),
            qty,
            price: Money::from_units(price),
        }
    }

    #[test]
    fn test_subtotal_is_sum_of_lines() {
        let items = vec![item(5, 100), item(2, 200), item(1000, 1_000_000)];
        let expected = 5 * 100 + 2 * 200 + 1000 * 1_000_000;
        assert_eq!(compute_subtotal(&items).units(), expected);
    }

    #[test]
    fn test_subtotal_of_nothing_is_zero() {
        let items: Vec<Item> = Vec::new();
        assert_eq!(compute_subtotal(&items), Money::zero());
        assert_eq!(compute_grand_total(&items, Money::zero()), Money::zero());
    }

    #[test]
    fn test_grand_total_subtracts_discount() {
        let items = vec![item(3, 150)];
        assert_eq!(
            compute_grand_total(&items, Money::from_units(50)),
            compute_subtotal(&items) - Money::from_units(50)
        );
    }

    #[test]
    fn test_grand_total_goes_negative() {
        let items = vec![item(1, 100)];
        let total = compute_grand_total(&items, Money::from_units(250));
        assert_eq!(total.units(), -150);
        assert!(total.is_negative());
    }

    /// Create TEST-001 with one line, add a second line, then a discount.
    #[test]
    fn test_invoice_editing_scenario() {
        let mut items = vec![item(5, 100)];
        assert_eq!(compute_grand_total(&items, Money::zero()).units(), 500);

        items.push(item(2, 200));
        assert_eq!(compute_grand_total(&items, Money::zero()).units(), 900);

        assert_eq!(compute_grand_total(&items, Money::from_units(50)).units(), 850);
    }

    #[test]
    fn test_drafts_and_items_agree() {
        let items = vec![item(5, 100), item(2, 200)];
        let drafts = vec![ItemDraft::new("a", 5, 100), ItemDraft::new("b", 2, 200)];
        assert_eq!(compute_subtotal(&items), compute_subtotal(&drafts));
    }

    #[test]
    fn test_sale_totals() {
        let totals = SaleTotals::of(&[item(4, 250)], Money::from_units(100));
        assert_eq!(totals.subtotal.units(), 1000);
        assert_eq!(totals.discount.units(), 100);
        assert_eq!(totals.grand_total.units(), 900);
    }
}
