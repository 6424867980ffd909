//! # Metrics Aggregator
//!
//! Pure functions deriving HQ dashboard figures from store snapshots.
//!
//! ## Recompute Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Snapshot change (either collection)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  compute_metrics(products, orders, threshold)   ← full recompute        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  MetricsSnapshot (revenue, tax, volume, stock, low-stock, by-channel)   │
//! │                                                                         │
//! │  No caching, no incremental maintenance. Catalogue and ledger are       │
//! │  small; a full pass per refresh is cheaper than proving a cache is      │
//! │  invalidated on every snapshot change.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::money::{Micros, Money};
use crate::types::{ChannelKind, Order, Product};

/// Default retail-stock level at or below which a product counts as
/// low stock. Configuration, not business law: callers may override.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

// =============================================================================
// Snapshot Types
// =============================================================================

/// Revenue and volume for one sales channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelMetrics {
    pub revenue: Money,
    pub order_count: usize,
}

/// Everything the HQ view derives from the two collections.
///
/// `PartialEq` is intentional: aggregation is pure, and tests assert that
/// recomputing over unchanged snapshots yields an identical value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Sum of all order totals.
    pub gross_revenue: Money,

    /// Sum of tax over tax-enabled orders, exact (micro-reais).
    pub total_tax_collected: Micros,

    /// Number of orders in the ledger.
    pub order_volume: usize,

    /// Units on hand at the retail terminal, all products.
    pub stock_retail_total: i64,

    /// Units on hand at the warehouse, all products.
    pub stock_warehouse_total: i64,

    /// Both locations combined.
    pub global_stock: i64,

    /// Products with `stock_retail <= threshold` (inclusive).
    pub low_stock: Vec<Product>,

    /// Products with `stock_retail == 0`; always a subset of `low_stock`.
    pub rupture: Vec<Product>,

    /// Revenue/volume keyed by the closed channel enumeration.
    pub by_channel: BTreeMap<ChannelKind, ChannelMetrics>,
}

// =============================================================================
// Aggregation
// =============================================================================

/// Computes the full metrics snapshot from current store snapshots.
///
/// Pure: no hidden state, no mutation of the inputs. Calling it twice on
/// the same snapshots yields identical results.
///
/// ## Example
/// ```rust,ignore
/// let metrics = compute_metrics(&products, &orders, DEFAULT_LOW_STOCK_THRESHOLD);
/// println!("revenue: {}", metrics.gross_revenue);
/// ```
pub fn compute_metrics(
    products: &[Product],
    orders: &[Order],
    low_stock_threshold: i64,
) -> MetricsSnapshot {
    let gross_revenue: Money = orders.iter().map(Order::total).sum();

    let total_tax_collected: Micros = orders
        .iter()
        .filter_map(|o| o.tax.as_ref())
        .map(|t| t.total())
        .sum();

    let stock_retail_total: i64 = products.iter().map(|p| p.stock_retail).sum();
    let stock_warehouse_total: i64 = products.iter().map(|p| p.stock_warehouse).sum();

    let low_stock: Vec<Product> = products
        .iter()
        .filter(|p| p.stock_retail <= low_stock_threshold)
        .cloned()
        .collect();

    let rupture: Vec<Product> = products
        .iter()
        .filter(|p| p.stock_retail == 0)
        .cloned()
        .collect();

    let mut by_channel: BTreeMap<ChannelKind, ChannelMetrics> = BTreeMap::new();
    for order in orders {
        let entry = by_channel.entry(order.channel).or_default();
        entry.revenue += order.total();
        entry.order_count += 1;
    }

    MetricsSnapshot {
        gross_revenue,
        total_tax_collected,
        order_volume: orders.len(),
        stock_retail_total,
        stock_warehouse_total,
        global_stock: stock_retail_total + stock_warehouse_total,
        low_stock,
        rupture,
        by_channel,
    }
}

/// Sorts orders for display: newest first, ties broken by id descending.
///
/// Display-only. Concurrent terminals may interleave writes; the ledger
/// itself carries no ordering guarantee and no logic depends on one.
pub fn sort_orders_for_display(orders: &mut [Order]) {
    orders.sort_by(|a, b| {
        (Reverse(a.created_at), Reverse(a.id.as_str()))
            .cmp(&(Reverse(b.created_at), Reverse(b.id.as_str())))
    });
}

// =============================================================================
// Unit Tests
// =============================================================================
