//! # Order Ledger Repository
//!
//! Database operations for the append-only order ledger.
//!
//! ## Ledger Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Append-Only Ledger                                 │
//! │                                                                         │
//! │  append(order)  ← the normal path; orders are never updated            │
//! │  delete(id)     ← the ONE exception: compensation when the paired      │
//! │                   stock decrement fails after the order landed          │
//! │                                                                         │
//! │  Tax micros are stored as three nullable columns that are present or   │
//! │  absent as a unit, mirroring the Option<TaxBreakdown> on the type.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, info, warn};

use chrono::{DateTime, Utc};
use sudvie_core::{ChannelKind, Micros, Order, TaxBreakdown};

use crate::error::{StoreError, StoreResult};
use crate::listener::ChangeFeed;

/// Flat row shape for the orders table. The three tax columns fold back
/// into `Option<TaxBreakdown>` on the way out.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    product_name: String,
    total_cents: i64,
    channel: ChannelKind,
    channel_label: String,
    import_tax_micros: Option<i64>,
    excise_tax_micros: Option<i64>,
    sales_tax_micros: Option<i64>,
    fiscal_reference: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        let tax = match (
            row.import_tax_micros,
            row.excise_tax_micros,
            row.sales_tax_micros,
        ) {
            (Some(import), Some(excise), Some(sales)) => Some(TaxBreakdown {
                import_tax: Micros::from_micros(import),
                excise_tax: Micros::from_micros(excise),
                sales_tax: Micros::from_micros(sales),
            }),
            _ => None,
        };

        Order {
            id: row.id,
            product_name: row.product_name,
            total_cents: row.total_cents,
            tax,
            channel: row.channel,
            channel_label: row.channel_label,
            fiscal_reference: row.fiscal_reference,
            created_at: row.created_at,
        }
    }
}

/// Repository for order-ledger operations.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
    feed: Arc<ChangeFeed>,
}

impl LedgerRepository {
    pub fn new(pool: SqlitePool, feed: Arc<ChangeFeed>) -> Self {
        LedgerRepository { pool, feed }
    }

    // =========================================================================
    // Append
    // =========================================================================

    /// Appends a fully formed order to the ledger. Notifies the ledger feed
    /// on success.
    pub async fn append(&self, order: &Order) -> StoreResult<()> {
        debug!(id = %order.id, product = %order.product_name, "Appending order");

        let (import, excise, sales) = match &order.tax {
            Some(t) => (
                Some(t.import_tax.micros()),
                Some(t.excise_tax.micros()),
                Some(t.sales_tax.micros()),
            ),
            None => (None, None, None),
        };

        sqlx::query(
            r#"
            INSERT INTO orders
                (id, product_name, total_cents, channel, channel_label,
                 import_tax_micros, excise_tax_micros, sales_tax_micros,
                 fiscal_reference, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&order.id)
        .bind(&order.product_name)
        .bind(order.total_cents)
        .bind(order.channel)
        .bind(&order.channel_label)
        .bind(import)
        .bind(excise)
        .bind(sales)
        .bind(&order.fiscal_reference)
        .bind(order.created_at)
        .execute(&self.pool)
        .await?;

        info!(
            id = %order.id,
            total_cents = order.total_cents,
            channel = order.channel.as_str(),
            "Order appended"
        );
        self.feed.notify();
        Ok(())
    }

    // =========================================================================
    // Read
    // =========================================================================

    /// Lists all orders, newest first. Ties on the timestamp break by id
    /// descending so the ordering is total.
    pub async fn list(&self) -> StoreResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, product_name, total_cents, channel, channel_label,
                   import_tax_micros, excise_tax_micros, sales_tax_micros,
                   fiscal_reference, created_at
            FROM orders
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed order ledger");
        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// Fetches a single order by ID.
    pub async fn get_by_id(&self, id: &str) -> StoreResult<Order> {
        sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, product_name, total_cents, channel, channel_label,
                   import_tax_micros, excise_tax_micros, sales_tax_micros,
                   fiscal_reference, created_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Order::from)
        .ok_or_else(|| StoreError::not_found("Order", id))
    }

    // =========================================================================
    // Compensation
    // =========================================================================

    /// Removes an order. Only the fulfillment saga calls this, to undo an
    /// append whose paired stock decrement failed.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        warn!(id = %id, "Compensating: removing order from ledger");

        let result = sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Order", id));
        }

        self.feed.notify();
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
