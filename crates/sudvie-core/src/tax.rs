//! # Tax Calculator
//!
//! Fixed-rate import tax breakdown for fulfilled orders.
//!
//! The three rates are frozen constants, not configuration: historical
//! order records embed them implicitly, and changing them would make old
//! ledgers unreadable. Amounts are exact micro-reais; rounding to two
//! decimals is a presentation concern.

use serde::{Deserialize, Serialize};

use crate::money::{Micros, Money, TaxRate};

/// Import duty on EU wine: 18.00%.
pub const IMPORT_TAX_RATE: TaxRate = TaxRate::from_bps(1_800);

/// Federal excise (IPI equivalent): 6.50%.
pub const EXCISE_TAX_RATE: TaxRate = TaxRate::from_bps(650);

/// State sales tax: 9.25%.
pub const SALES_TAX_RATE: TaxRate = TaxRate::from_bps(925);

/// The per-order tax breakdown, present on orders from tax-enabled channels.
///
/// ## Example
/// ```rust
/// use sudvie_core::money::Money;
/// use sudvie_core::tax::TaxBreakdown;
///
/// let tax = TaxBreakdown::for_price(Money::from_cents(10_000)); // R$ 100.00
/// assert_eq!(tax.import_tax.micros(), 18_000_000); // R$ 18.00
/// assert_eq!(tax.excise_tax.micros(), 6_500_000);  // R$ 6.50
/// assert_eq!(tax.sales_tax.micros(), 9_250_000);   // R$ 9.25
/// assert_eq!(tax.total().micros(), 33_750_000);    // R$ 33.75
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdown {
    pub import_tax: Micros,
    pub excise_tax: Micros,
    pub sales_tax: Micros,
}

impl TaxBreakdown {
    /// Computes the breakdown for a price. Pure; no rounding.
    pub const fn for_price(price: Money) -> Self {
        TaxBreakdown {
            import_tax: price.exact_tax(IMPORT_TAX_RATE),
            excise_tax: price.exact_tax(EXCISE_TAX_RATE),
            sales_tax: price.exact_tax(SALES_TAX_RATE),
        }
    }

    /// Total tax collected on the order.
    pub const fn total(&self) -> Micros {
        Micros::from_micros(
            self.import_tax.micros() + self.excise_tax.micros() + self.sales_tax.micros(),
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
