//! # Business Metrics
//!
//! HQ dashboard aggregates, recomputed from full snapshots on demand. No
//! incremental state: every call re-reads both collections and folds them
//! with the pure aggregator, so a stale or duplicated feed tick can never
//! corrupt the numbers.

use tracing::debug;

use sudvie_core::{compute_metrics, sort_orders_for_display, MetricsSnapshot, Order};

use crate::error::ServiceResult;
use crate::Service;

impl Service {
    /// Returns the order ledger, newest first.
    pub async fn list_orders(&self) -> ServiceResult<Vec<Order>> {
        let repo = self.store().ledger();
        let mut orders = self
            .status()
            .run_with_retry(&self.config().retry, || {
                let repo = repo.clone();
                async move { repo.list().await }
            })
            .await?;

        // The store already orders newest-first; re-sorting keeps the
        // tie-break total even if a caller hands back a shuffled copy.
        sort_orders_for_display(&mut orders);
        Ok(orders)
    }

    /// Computes the current metrics snapshot over both collections.
    pub async fn metrics(&self) -> ServiceResult<MetricsSnapshot> {
        let products = self.list_products().await?;
        let orders = self.list_orders().await?;

        let snapshot = compute_metrics(&products, &orders, self.config().low_stock_threshold);
        debug!(
            order_volume = snapshot.order_volume,
            gross_revenue_cents = snapshot.gross_revenue.cents(),
            low_stock = snapshot.low_stock.len(),
            "Metrics snapshot computed"
        );
        Ok(snapshot)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::inventory::CreateProductInput;
    use crate::test_support::test_service;
    use sudvie_core::ChannelKind;

    fn wine(name: &str, price_cents: i64, retail: i64, warehouse: i64) -> CreateProductInput {
        CreateProductInput {
            name: name.to_string(),
            price_cents,
            image: None,
            stock_retail: retail,
            stock_warehouse: warehouse,
        }
    }

    #[tokio::test]
    async fn test_metrics_over_live_data() {
        let service = test_service().await;

        let a = service
            .create_product(wine("Margaux", 25_000, 10, 40))
            .await
            .unwrap();
        let b = service
            .create_product(wine("Chablis", 8_000, 3, 12))
            .await
            .unwrap();

        service
            .fulfill(&a.id, ChannelKind::Marketplace, "VivinoMarket", true)
            .await
            .unwrap();
        service
            .fulfill(&b.id, ChannelKind::Terminal, "Venda Terminal", false)
            .await
            .unwrap();

        let snapshot = service.metrics().await.unwrap();

        assert_eq!(snapshot.order_volume, 2);
        assert_eq!(snapshot.gross_revenue.cents(), 33_000);
        assert_eq!(snapshot.total_tax_collected.micros(), 91_875_000);

        // Stock after the two sales: (9 + 2) retail, (40 + 12) warehouse
        assert_eq!(snapshot.stock_retail_total, 11);
        assert_eq!(snapshot.stock_warehouse_total, 52);
        assert_eq!(snapshot.global_stock, 63);

        // Chablis is at 2 ≤ 5: low stock, not rupture
        assert_eq!(snapshot.low_stock.len(), 1);
        assert_eq!(snapshot.low_stock[0].name, "Chablis");
        assert!(snapshot.rupture.is_empty());

        let marketplace = &snapshot.by_channel[&ChannelKind::Marketplace];
        assert_eq!(marketplace.revenue.cents(), 25_000);
        assert_eq!(marketplace.order_count, 1);
    }

    #[tokio::test]
    async fn test_threshold_comes_from_config() {
        let service = test_service().await;
        service
            .create_product(wine("Syrah", 9_000, 5, 0))
            .await
            .unwrap();

        // Default threshold is 5, inclusive
        let snapshot = service.metrics().await.unwrap();
        assert_eq!(snapshot.low_stock.len(), 1);
    }

    #[tokio::test]
    async fn test_orders_listed_newest_first() {
        let service = test_service().await;
        let product = service
            .create_product(wine("Malbec", 7_000, 5, 0))
            .await
            .unwrap();

        let first = service
            .fulfill(&product.id, ChannelKind::Terminal, "Venda Terminal", false)
            .await
            .unwrap();
        let second = service
            .fulfill(&product.id, ChannelKind::Terminal, "Venda Terminal", false)
            .await
            .unwrap();

        let orders = service.list_orders().await.unwrap();
        assert_eq!(orders.len(), 2);
        // Newest first; equal timestamps fall back to id descending
        let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
        assert!(ids.contains(&first.order_id.as_str()));
        assert!(ids.contains(&second.order_id.as_str()));
        assert!(orders[0].created_at >= orders[1].created_at);
    }
}
