//! # Domain Types
//!
//! Core domain types for the Sudvie import business.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Order       │   │  ChannelKind    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  Terminal       │       │
//! │  │  name           │   │  product_name   │   │  Marketplace    │       │
//! │  │  price_cents    │   │  total_cents    │   │  FieldAgent     │       │
//! │  │  stock_retail   │   │  tax (optional) │   └─────────────────┘       │
//! │  │  stock_warehouse│   │  channel        │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! An order carries a denormalized copy of the product name at time of
//! sale, never a foreign key. Orders are immutable historical facts: a
//! later product rename does not rewrite the ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::tax::TaxBreakdown;

// =============================================================================
// Product
// =============================================================================

/// A wine in the inventory.
///
/// Stock is tracked at two independent locations:
/// - `stock_retail`: the Natal terminal, decremented by fulfillment.
/// - `stock_warehouse`: the Bordeaux warehouse, set at creation.
///
/// There is no automatic transfer between them; replenishment of the
/// retail counter is a manual, out-of-band operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4), assigned by the store.
    pub id: String,

    /// Display name, non-empty.
    pub name: String,

    /// Price in centavos (BRL).
    pub price_cents: i64,

    /// Optional encoded label still (data URL), captured by the device layer.
    pub image: Option<String>,

    /// Units on hand at the retail terminal. Never negative: a fulfillment
    /// that would drive it below zero is rejected, not clamped.
    pub stock_retail: i64,

    /// Units on hand at the origin warehouse.
    pub stock_warehouse: i64,

    /// When the product was created, assigned by the store.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether one unit can be sold from the retail counter.
    #[inline]
    pub fn can_sell(&self) -> bool {
        self.stock_retail > 0
    }
}

// =============================================================================
// Channel Kind
// =============================================================================

/// Where a sale originated.
///
/// A closed enumeration assigned at order-creation time. The free-text
/// label the operator sees is kept separately on the order
/// (`channel_label`); aggregation keys on this enum only, so a marketplace
/// literally named "Amazon Basin Imports" can never be misclassified by a
/// substring match.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// In-person sale at the retail terminal.
    Terminal,
    /// A third-party marketplace listing.
    Marketplace,
    /// A field agent selling on the road.
    FieldAgent,
}

impl ChannelKind {
    /// Stable label for logs and metrics keys.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Terminal => "terminal",
            ChannelKind::Marketplace => "marketplace",
            ChannelKind::FieldAgent => "field_agent",
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// A completed sale in the append-only ledger.
///
/// Orders are created only by fulfillment and never mutated. The single
/// sanctioned exception is the fulfillment compensation path, which may
/// void an order whose matching stock decrement failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique identifier (UUID v4), assigned by the store.
    pub id: String,

    /// Product name at time of sale (frozen snapshot, not a reference).
    pub product_name: String,

    /// Sale total in centavos, copied from the product price at time of sale.
    pub total_cents: i64,

    /// Tax breakdown; present only for tax-enabled channels.
    pub tax: Option<TaxBreakdown>,

    /// Closed channel classification, assigned at creation.
    pub channel: ChannelKind,

    /// Free-text channel label for display ("Venda Terminal", an agent name).
    pub channel_label: String,

    /// Opaque correlation token, format `TX-<6 alphanumeric>`. Present only
    /// when tax was computed. Not a legal fiscal identifier; uniqueness is
    /// not enforced.
    pub fiscal_reference: Option<String>,

    /// When the order was recorded, assigned by the store.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_sell_gate() {
        let mut product = Product {
            id: "p1".to_string(),
            name: "Château Test".to_string(),
            price_cents: 12_000,
            image: None,
            stock_retail: 1,
            stock_warehouse: 50,
            created_at: Utc::now(),
        };
        assert!(product.can_sell());

        product.stock_retail = 0;
        assert!(!product.can_sell());
    }

    #[test]
    fn test_channel_kind_labels() {
        assert_eq!(ChannelKind::Terminal.as_str(), "terminal");
        assert_eq!(ChannelKind::Marketplace.as_str(), "marketplace");
        assert_eq!(ChannelKind::FieldAgent.as_str(), "field_agent");
    }

    #[test]
    fn test_order_serializes_camel_case() {
        let order = Order {
            id: "o1".to_string(),
            product_name: "Château Test".to_string(),
            total_cents: 12_000,
            tax: None,
            channel: ChannelKind::Terminal,
            channel_label: "Venda Terminal".to_string(),
            fiscal_reference: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&order);
        // serde_json is a dev-dependency only; keep the assertion structural
        assert!(json.is_ok());
        let json = json.unwrap_or_default();
        assert!(json.contains("\"productName\""));
        assert!(json.contains("\"channel\":\"terminal\""));
    }
}
