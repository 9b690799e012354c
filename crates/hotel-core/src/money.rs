//! # Money Module
//!
//! Provides the `Money` type for handling prices and revenue safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every amount is a whole number of the smallest currency unit.          │
//! │                                                                         │
//! │    Room      1200                                                       │
//! │    Burger     120   × 3  →  360                                         │
//! │                                                                         │
//! │  No floats, no rounding, no currency symbols. Rendering is left to the  │
//! │  caller.                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use hotel_core::money::Money;
//!
//! let price = Money::from_units(120);
//! let total = price.checked_mul_quantity(3).unwrap();
//! assert_eq!(total.units(), 360);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64**: matches the INTEGER columns in SQLite
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Transparent serde**: serializes as a bare integer
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from smallest currency units.
    ///
    /// ## Example
    /// ```rust
    /// use hotel_core::money::Money;
    ///
    /// let room = Money::from_units(1200);
    /// assert_eq!(room.units(), 1200);
    /// ```
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    /// Returns the value in smallest currency units.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
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

    /// Multiplies a unit price by a quantity, returning `None` on overflow.
    ///
    /// ## User Workflow
    /// ```text
    /// Burger: 120
    /// Quantity: 3
    ///      │
    ///      ▼
    /// checked_mul_quantity(3) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Bill total: 360
    /// ```
    #[inline]
    pub const fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(total) => Some(Money(total)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders the bare unit count, e.g. `1200`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Saturates at `i64::MAX`/`i64::MIN`; report totals never wrap or panic.
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

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_units() {
        let money = Money::from_units(1200);
        assert_eq!(money.units(), 1200);
        assert!(!money.is_zero());
        assert!(!money.is_negative());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_units(1200)), "1200");
        assert_eq!(format!("{}", Money::zero()), "0");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_units(360);
        let b = Money::from_units(1200);
        assert_eq!((a + b).units(), 1560);

        let mut c = a;
        c += b;
        assert_eq!(c.units(), 1560);

        let total: Money = [a, b, Money::from_units(40)].into_iter().sum();
        assert_eq!(total.units(), 1600);
    }

    #[test]
    fn test_checked_mul_quantity() {
        let burger = Money::from_units(120);
        assert_eq!(burger.checked_mul_quantity(3), Some(Money::from_units(360)));
        assert_eq!(Money::from_units(i64::MAX).checked_mul_quantity(2), None);
    }

    #[test]
    fn test_addition_saturates() {
        let huge = Money::from_units(i64::MAX);
        assert_eq!(huge + Money::from_units(1), huge);

        let mut running = Money::from_units(i64::MAX - 10);
        running += Money::from_units(360);
        assert_eq!(running, huge);

        let total: Money = [huge, huge, Money::from_units(120)].into_iter().sum();
        assert_eq!(total, huge);
    }

    #[test]
    fn test_serializes_as_bare_integer() {
        let json = serde_json::to_string(&Money::from_units(250)).unwrap();
        assert_eq!(json, "250");
    }
}
