//! # Money Module
//!
//! Provides the `Money` type for amounts in the ledger currency.
//!
//! ## Whole Units
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The ledger records Rupiah, which has no minor unit in practice.        │
//! │                                                                         │
//! │  Form input "Rp 1.500.000" ──► mask_number ──► 1500000                  │
//! │                                                 │                       │
//! │                                    Money::from_units(1500000)           │
//! │                                                 │                       │
//! │                         Display ──► "Rp 1.500.000"                      │
//! │                                                                         │
//! │  Integers all the way: no float rounding in any total.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Money;
//!
//! let price = Money::from_units(1_500);
//! let line = price.multiply_quantity(3);
//! assert_eq!(line.units(), 4_500);
//! assert_eq!(line.to_string(), "Rp 4.500");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

/// Currency prefix used by [`Money`]'s `Display`.
pub const CURRENCY_PREFIX: &str = "Rp";

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in whole currency units.
///
/// ## Design Decisions
/// - **i64 (signed)**: a grand total goes negative when the discount is
///   larger than the subtotal, and that must be representable
/// - **Single field tuple struct**: serializes as a bare JSON number, which
///   is what the persisted document stores
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole currency units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    /// Returns the amount in whole currency units.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.saturating_abs())
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// Saturates instead of overflowing: drafts are totalled before they are
    /// validated, so the inputs here are not yet bounded.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let unit_price = Money::from_units(200);
    /// assert_eq!(unit_price.multiply_quantity(2).units(), 400);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Formats the bare amount with Indonesian digit grouping.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// assert_eq!(Money::from_units(1_234_567).grouped(), "1.234.567");
    /// assert_eq!(Money::from_units(-50).grouped(), "-50");
    /// ```
    pub fn grouped(&self) -> String {
        let digits = self.0.unsigned_abs().to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

        if self.0 < 0 {
            out.push('-');
        }

        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push('.');
            }
            out.push(ch);
        }

        out
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount the way the sale views do: `Rp 1.234.567`.
///
/// A negative amount keeps the prefix first: `Rp -50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", CURRENCY_PREFIX, self.grouped())
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
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

/// Multiplication by a quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Input Masking
// =============================================================================

/// Reads a number out of free-form numeric input.
///
/// Every character that is not an ASCII digit is dropped, so currency
/// prefixes and separators typed (or displayed) in a field don't matter.
///
/// ## Rules
/// - No digits at all → `0`
/// - Too many digits for an `i64` → `i64::MAX`
/// - A leading `-` is dropped like any other symbol, so the result is never
///   negative
///
/// ## Example
/// ```rust
/// use tally_core::money::mask_number;
///
/// assert_eq!(mask_number("Rp 1.500.000"), 1_500_000);
/// assert_eq!(mask_number("12abc3"), 123);
/// assert_eq!(mask_number(""), 0);
/// ```
pub fn mask_number(input: &str) -> i64 {
    input
        .bytes()
        .filter(u8::is_ascii_digit)
        .fold(0i64, |acc, b| {
            acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
        })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::from_units(0).to_string(), "Rp 0");
        assert_eq!(Money::from_units(500).to_string(), "Rp 500");
        assert_eq!(Money::from_units(1000).to_string(), "Rp 1.000");
        assert_eq!(Money::from_units(850).to_string(), "Rp 850");
        assert_eq!(Money::from_units(1_000_000).to_string(), "Rp 1.000.000");
        assert_eq!(Money::from_units(-1_250).to_string(), "Rp -1.250");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_units(1000);
        let b = Money::from_units(250);

        assert_eq!((a + b).units(), 1250);
        assert_eq!((a - b).units(), 750);
        assert_eq!((b - a).units(), -750);
        assert_eq!((a * 3).units(), 3000);
        assert_eq!((-a).units(), -1000);

        let mut c = a;
        c += b;
        c -= Money::from_units(50);
        assert_eq!(c.units(), 1200);
    }

    #[test]
    fn test_sum() {
        let amounts = [Money::from_units(500), Money::from_units(400)];
        let total: Money = amounts.iter().sum();
        assert_eq!(total.units(), 900);

        let empty: Money = std::iter::empty::<Money>().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_units(1).is_positive());
        assert!(Money::from_units(-1).is_negative());
        assert_eq!(Money::from_units(-7).abs().units(), 7);
    }

    #[test]
    fn test_multiply_quantity_saturates() {
        let huge = Money::from_units(i64::MAX / 2);
        assert_eq!(huge.multiply_quantity(3).units(), i64::MAX);
    }

    #[test]
    fn test_serializes_as_bare_number() {
        let json = serde_json::to_string(&Money::from_units(1500)).unwrap();
        assert_eq!(json, "1500");

        let back: Money = serde_json::from_str("1500").unwrap();
        assert_eq!(back, Money::from_units(1500));
    }

    #[test]
    fn test_mask_number() {
        assert_eq!(mask_number("1000"), 1000);
        assert_eq!(mask_number("Rp 1.000"), 1000);
        assert_eq!(mask_number("  5 "), 5);
        assert_eq!(mask_number("-1"), 1);
        assert_eq!(mask_number("abc"), 0);
        assert_eq!(mask_number("99999999999999999999999"), i64::MAX);
    }
}
