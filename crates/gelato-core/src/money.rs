//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Self-service ice cream is priced per kilo:                             │
//! │    R$ 47,90/kg × 0.333 kg in floats = 15.950699999999998  ❌            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    4790 × 333 g / 1000 = 1595.07 → 1595 centavos (R$ 15,95)            │
//! │    Rounding happens exactly once, at a known place                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use gelato_core::money::Money;
//!
//! let scoop = Money::from_cents(450); // R$ 4,50
//! let two_scoops = scoop * 2_i64;        // R$ 9,00
//! assert_eq!(two_scoops.cents(), 900);
//!
//! let per_kilo = Money::from_major_minor(47, 0);
//! assert_eq!(per_kilo.multiply_weight_grams(500).cents(), 2350); // R$ 23,50
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

/// Grams per kilogram, the unit weight-priced products are quoted in.
pub const GRAMS_PER_KILO: i64 = 1000;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos (the smallest unit of the Brazilian real).
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.price ──► SaleItem total ──► Order total ──► Payment / change │
/// │                                            │                            │
/// │                                            └──► SalesReport revenue     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ## Example
    /// ```rust
    /// use gelato_core::money::Money;
    ///
    /// let price = Money::from_cents(450);
    /// assert_eq!(price.cents(), 450);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from reais and centavos.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -R$ 5,50.
    ///
    /// ```rust
    /// use gelato_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(4, 50).cents(), 450);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole reais portion.
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavos portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
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

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Prices a weight in grams against a per-kilo price.
    ///
    /// ## Rounding
    /// `price_cents × grams / 1000`, rounded half away from zero to the
    /// nearest centavo. Uses i128 so large weights cannot overflow.
    ///
    /// ```text
    /// Açaí self-service: R$ 47,90/kg
    /// Plate weighs:      333 g
    ///      │
    ///      ▼
    /// multiply_weight_grams(333) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// 4790 × 333 / 1000 = 1595.07 → R$ 15,95
    /// ```
    pub fn multiply_weight_grams(&self, grams: u32) -> Money {
        let scaled = self.0 as i128 * grams as i128;
        let divisor = GRAMS_PER_KILO as i128;
        let half = divisor / 2;
        let rounded = if scaled >= 0 {
            (scaled + half) / divisor
        } else {
            (scaled - half) / divisor
        };
        Money::from_cents(rounded as i64)
    }

    /// Splits the amount evenly across `count` parts, rounding half up.
    ///
    /// Returns zero when `count` is zero, which is what an average ticket
    /// over no sales should read.
    ///
    /// ```rust
    /// use gelato_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1000).average_over(3).cents(), 333);
    /// assert_eq!(Money::from_cents(1000).average_over(0).cents(), 0);
    /// ```
    pub fn average_over(&self, count: usize) -> Money {
        if count == 0 {
            return Money::zero();
        }
        let count = count as i128;
        let total = self.0 as i128;
        let avg = if total >= 0 {
            (total * 2 + count) / (count * 2)
        } else {
            (total * 2 - count) / (count * 2)
        };
        Money::from_cents(avg as i64)
    }

    /// Formats the amount with a currency symbol, Brazilian style.
    ///
    /// ```rust
    /// use gelato_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(2350).format_with("R$"), "R$ 23,50");
    /// assert_eq!(Money::from_cents(-550).format_with("R$"), "-R$ 5,50");
    /// ```
    pub fn format_with(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{} {},{:02}",
            sign,
            symbol,
            self.reais().abs(),
            self.cents_part()
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly rendering in reais. Receipts use `format_with` so the
/// configured symbol is honoured.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with("R$"))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        Money(self.0 * i64::from(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
