//! # Money Module
//!
//! Monetary values for the Sudvie core, in BRL.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: two integer units                                        │
//! │    Money  = centavos     (10^-2 BRL)  prices, order totals             │
//! │    Micros = micro-reais  (10^-6 BRL)  exact tax amounts                │
//! │                                                                         │
//! │  price_cents × rate_bps is ALWAYS an exact number of micro-reais:      │
//! │    (C/100 BRL) × (B/10000) = C×B × 10^-6 BRL                           │
//! │                                                                         │
//! │  So R$ 250.00 at 9.25% = 25000 × 925 = 23,125,000 µBRL = R$ 23.1250   │
//! │  No rounding happens until a caller asks for display.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate in basis points (1 bps = 0.01% = 1/10000).
///
/// 1800 bps = 18.00% (import duty on EU wine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Money (centavos)
// =============================================================================

/// A monetary value in centavos (10^-2 BRL).
///
/// Every price and order total in the system flows through this type.
/// Signed so that reconciliation deltas can go negative.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ## Example
    /// ```rust
    /// use sudvie_core::money::Money;
    ///
    /// let price = Money::from_cents(12_000); // R$ 120.00
    /// assert_eq!(price.cents(), 12_000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-real portion.
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavo portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Computes the exact tax amount at `rate`, without rounding.
    ///
    /// The result is in micro-reais: `cents × bps` is exact because
    /// 10^-2 × 10^-4 = 10^-6.
    ///
    /// ## Example
    /// ```rust
    /// use sudvie_core::money::{Money, TaxRate};
    ///
    /// let price = Money::from_cents(10_000);      // R$ 100.00
    /// let tax = price.exact_tax(TaxRate::from_bps(925)); // 9.25%
    /// assert_eq!(tax.micros(), 9_250_000);        // R$ 9.25 exactly
    /// ```
    #[inline]
    pub const fn exact_tax(&self, rate: TaxRate) -> Micros {
        Micros(self.0 * rate.bps() as i64)
    }

    /// Converts to micro-reais losslessly.
    #[inline]
    pub const fn to_micros(&self) -> Micros {
        Micros(self.0 * 10_000)
    }
}

/// Debug-friendly display ("R$ 120.00"). Locale formatting is a
/// presentation concern.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}R$ {}.{:02}", sign, self.reais().abs(), self.cents_part())
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

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Micros (micro-reais)
// =============================================================================

/// A monetary value in micro-reais (10^-6 BRL).
///
/// Used for tax amounts, which must accumulate without internal rounding:
/// three fulfillments of a R$ 250.00 bottle collect exactly R$ 275.625 of
/// tax, a value no centavo type can hold.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Micros(i64);

impl Micros {
    /// Creates a value from micro-reais.
    #[inline]
    pub const fn from_micros(micros: i64) -> Self {
        Micros(micros)
    }

    /// Returns the value in micro-reais.
    #[inline]
    pub const fn micros(&self) -> i64 {
        self.0
    }

    /// Zero value.
    #[inline]
    pub const fn zero() -> Self {
        Micros(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Rounds to centavos for display (half away from zero).
    ///
    /// ## Example
    /// ```rust
    /// use sudvie_core::money::Micros;
    ///
    /// // R$ 91.875 displays as R$ 91.88
    /// assert_eq!(Micros::from_micros(91_875_000).to_money_rounded().cents(), 9_188);
    /// ```
    pub const fn to_money_rounded(&self) -> Money {
        let half = if self.0 < 0 { -5_000 } else { 5_000 };
        Money::from_cents((self.0 + half) / 10_000)
    }
}

/// Display with full micro precision ("R$ 91.875000").
impl fmt::Display for Micros {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}R$ {}.{:06}",
            sign,
            (self.0 / 1_000_000).abs(),
            (self.0 % 1_000_000).abs()
        )
    }
}

impl Add for Micros {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Micros(self.0 + other.0)
    }
}

impl AddAssign for Micros {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Micros {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Micros(self.0 - other.0)
    }
}

impl Sum for Micros {
    fn sum<I: Iterator<Item = Micros>>(iter: I) -> Self {
        iter.fold(Micros::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
