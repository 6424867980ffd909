//! # Order Fulfillment
//!
//! The order-append plus stock-decrement pair, executed as a compensated
//! saga so the two collections cannot drift apart silently.
//!
//! ## Saga
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Fulfillment Saga                                   │
//! │                                                                         │
//! │  1. Validate channel label                                             │
//! │  2. Load product ──────────────────────────▶ ProductNotFound           │
//! │  3. Stock gate (stock_retail > 0) ─────────▶ OutOfStock                │
//! │  4. Build order (price snapshot, optional tax + fiscal reference)      │
//! │  5. Append order to ledger                                             │
//! │  6. Conditionally decrement retail stock                               │
//! │       │                                                                 │
//! │       ├─ ok ───────────────────────────────▶ Confirmation              │
//! │       │                                                                 │
//! │       └─ failed ─▶ 7. Compensate: delete the order                     │
//! │                       ├─ deleted ──────────▶ OutOfStock / store error  │
//! │                       └─ delete failed ────▶ PartialFailure            │
//! │                                                                         │
//! │  The decrement in step 6 carries its availability check inside the     │
//! │  UPDATE, so two terminals racing for the last bottle produce exactly   │
//! │  one confirmation and one OutOfStock.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use sudvie_core::{validation, ChannelKind, Order, Product, TaxBreakdown};
use sudvie_store::StoreError;

use crate::error::{FulfillmentError, ServiceResult};
use crate::Service;

/// What the operator sees after a successful sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    /// Ledger id of the recorded order.
    pub order_id: String,

    /// Human-readable confirmation line.
    pub message: String,

    /// Correlation token, present when tax was computed.
    pub fiscal_reference: Option<String>,
}

/// Generates a `TX-` correlation token: six uppercase hex characters drawn
/// from a fresh UUID. Opaque; uniqueness is not enforced.
fn generate_fiscal_reference() -> String {
    let raw = Uuid::new_v4().simple().to_string();
    format!("TX-{}", raw[..6].to_uppercase())
}

impl Service {
    /// Fulfills a single-unit sale of `product_id` through `channel`.
    ///
    /// ## Rules
    /// - The order total is the product price at this moment (snapshot)
    /// - `tax_enabled` channels get a tax breakdown and a fiscal reference;
    ///   others get neither
    /// - On success the ledger holds one new order and retail stock is one
    ///   lower; on any error other than `PartialFailure`, neither changed
    pub async fn fulfill(
        &self,
        product_id: &str,
        channel: ChannelKind,
        channel_label: &str,
        tax_enabled: bool,
    ) -> ServiceResult<Confirmation> {
        validation::validate_channel_label(channel_label)?;

        // Step 2: load the product (retried on connectivity failures)
        let inventory = self.store().inventory();
        let product = self
            .status()
            .run_with_retry(&self.config().retry, || {
                let repo = inventory.clone();
                let id = product_id.to_string();
                async move { repo.get_by_id(&id).await }
            })
            .await?;

        // Step 3: fast-path stock gate. Advisory only; the decrement below
        // is the authoritative check.
        if !product.can_sell() {
            debug!(id = %product.id, name = %product.name, "Rejected: no retail stock");
            return Err(FulfillmentError::OutOfStock { name: product.name });
        }

        // Step 4: build the order from the current snapshot
        let tax = tax_enabled.then(|| TaxBreakdown::for_price(product.price()));
        let fiscal_reference = tax.is_some().then(generate_fiscal_reference);

        let order = Order {
            id: Uuid::new_v4().to_string(),
            product_name: product.name.clone(),
            total_cents: product.price_cents,
            tax,
            channel,
            channel_label: channel_label.trim().to_string(),
            fiscal_reference,
            created_at: Utc::now(),
        };

        debug!(
            order_id = %order.id,
            product = %product.name,
            total_cents = order.total_cents,
            channel = channel.as_str(),
            tax_enabled,
            "Starting fulfillment"
        );

        self.record_sale(&product, order).await
    }

    /// Steps 5-6: append the order, then run the authoritative conditional
    /// decrement. Takes the product snapshot the caller already gated on;
    /// a snapshot gone stale is exactly what compensation exists for.
    async fn record_sale(&self, product: &Product, order: Order) -> ServiceResult<Confirmation> {
        // Append first. An order with stock still attached is recoverable
        // by compensation; a decrement with no order is not.
        self.store().ledger().append(&order).await?;

        match self
            .store()
            .inventory()
            .decrement_stock_retail(&product.id, 1)
            .await
        {
            Ok(updated) => {
                info!(
                    order_id = %order.id,
                    product = %product.name,
                    stock_remaining = updated.stock_retail,
                    "Fulfillment complete"
                );
                Ok(Confirmation {
                    order_id: order.id,
                    message: format!("Venda de {} registrada", product.name),
                    fiscal_reference: order.fiscal_reference,
                })
            }
            Err(decrement_err) => self.compensate(&order, decrement_err).await,
        }
    }

    /// Step 7: undo the append after a failed decrement.
    async fn compensate(
        &self,
        order: &Order,
        decrement_err: StoreError,
    ) -> ServiceResult<Confirmation> {
        warn!(
            order_id = %order.id,
            error = %decrement_err,
            "Stock decrement failed, voiding order"
        );

        match self.store().ledger().delete(&order.id).await {
            Ok(()) => {
                // Clean rollback: report the original failure
                match decrement_err {
                    StoreError::StockConflict { .. } => Err(FulfillmentError::OutOfStock {
                        name: order.product_name.clone(),
                    }),
                    other => Err(other.into()),
                }
            }
            Err(compensation_err) => {
                // Both legs failed. The order stands without its stock
                // movement; surface the id for manual repair.
                error!(
                    order_id = %order.id,
                    decrement_error = %decrement_err,
                    compensation_error = %compensation_err,
                    "Compensation failed: ledger and inventory have diverged"
                );
                Err(FulfillmentError::PartialFailure {
                    order_id: order.id.clone(),
                })
            }
        }
    }

    /// Subscribes to ledger changes.
    pub fn subscribe_orders(&self) -> watch::Receiver<u64> {
        self.store().ledger_feed().subscribe()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::CreateProductInput;
    use crate::test_support::test_service;
    use std::sync::Arc;

    fn chateau_test(stock_retail: i64) -> CreateProductInput {
        CreateProductInput {
            name: "Château Test".to_string(),
            price_cents: 12_000,
            image: None,
            stock_retail,
            stock_warehouse: 50,
        }
    }

    #[tokio::test]
    async fn test_fulfill_decrements_stock_and_appends_order() {
        let service = test_service().await;
        let product = service.create_product(chateau_test(1)).await.unwrap();

        let confirmation = service
            .fulfill(&product.id, ChannelKind::Terminal, "Venda Terminal", false)
            .await
            .unwrap();

        assert!(confirmation.message.contains("Château Test"));
        assert!(confirmation.fiscal_reference.is_none());

        let products = service.list_products().await.unwrap();
        assert_eq!(products[0].stock_retail, 0);
        assert_eq!(products[0].stock_warehouse, 50);

        let orders = service.list_orders().await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].product_name, "Château Test");
        assert_eq!(orders[0].total_cents, 12_000);
        assert!(orders[0].tax.is_none());
    }

    #[tokio::test]
    async fn test_second_sale_of_last_bottle_fails_cleanly() {
        let service = test_service().await;
        let product = service.create_product(chateau_test(1)).await.unwrap();

        service
            .fulfill(&product.id, ChannelKind::Terminal, "Venda Terminal", false)
            .await
            .unwrap();

        let err = service
            .fulfill(&product.id, ChannelKind::Terminal, "Venda Terminal", false)
            .await
            .unwrap_err();
        assert!(matches!(err, FulfillmentError::OutOfStock { .. }));

        // Exactly one order, stock still zero
        assert_eq!(service.list_orders().await.unwrap().len(), 1);
        let products = service.list_products().await.unwrap();
        assert_eq!(products[0].stock_retail, 0);
    }

    #[tokio::test]
    async fn test_tax_enabled_sale_carries_breakdown_and_reference() {
        let service = test_service().await;
        let mut input = chateau_test(3);
        input.price_cents = 25_000;
        let product = service.create_product(input).await.unwrap();

        let confirmation = service
            .fulfill(&product.id, ChannelKind::Marketplace, "VivinoMarket", true)
            .await
            .unwrap();

        let reference = confirmation.fiscal_reference.unwrap();
        assert!(reference.starts_with("TX-"));
        assert_eq!(reference.len(), 9);

        let orders = service.list_orders().await.unwrap();
        let tax = orders[0].tax.unwrap();
        // R$ 250.00 at 36.75% combined: exactly R$ 91.875
        assert_eq!(tax.total().micros(), 91_875_000);
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let service = test_service().await;
        let err = service
            .fulfill("no-such-id", ChannelKind::Terminal, "Venda Terminal", false)
            .await
            .unwrap_err();
        assert!(matches!(err, FulfillmentError::ProductNotFound(_)));
        assert!(service.list_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_channel_label_is_rejected() {
        let service = test_service().await;
        let product = service.create_product(chateau_test(1)).await.unwrap();

        let err = service
            .fulfill(&product.id, ChannelKind::FieldAgent, "  ", false)
            .await
            .unwrap_err();
        assert!(matches!(err, FulfillmentError::Validation(_)));
    }

    #[tokio::test]
    async fn test_concurrent_sales_of_last_bottle_produce_one_winner() {
        let service = Arc::new(test_service().await);
        let product = service.create_product(chateau_test(1)).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..2 {
            let service = Arc::clone(&service);
            let id = product.id.clone();
            handles.push(tokio::spawn(async move {
                service
                    .fulfill(&id, ChannelKind::Terminal, "Venda Terminal", false)
                    .await
            }));
        }

        let mut successes = 0;
        let mut out_of_stock = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(FulfillmentError::OutOfStock { .. }) => out_of_stock += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(out_of_stock, 1);
        assert_eq!(service.list_orders().await.unwrap().len(), 1);
        let products = service.list_products().await.unwrap();
        assert_eq!(products[0].stock_retail, 0);
    }

    #[tokio::test]
    async fn test_stale_snapshot_is_compensated() {
        // A snapshot that passed the stock gate can still lose the
        // decrement; the just-appended order must then be voided.
        let service = test_service().await;
        let product = service.create_product(chateau_test(1)).await.unwrap();

        // Drain the last unit out from under the snapshot
        service
            .store()
            .inventory()
            .decrement_stock_retail(&product.id, 1)
            .await
            .unwrap();

        let order = Order {
            id: Uuid::new_v4().to_string(),
            product_name: product.name.clone(),
            total_cents: product.price_cents,
            tax: None,
            channel: ChannelKind::Terminal,
            channel_label: "Venda Terminal".to_string(),
            fiscal_reference: None,
            created_at: Utc::now(),
        };

        let err = service.record_sale(&product, order).await.unwrap_err();
        assert!(matches!(err, FulfillmentError::OutOfStock { name } if name == "Château Test"));

        // Compensation removed the appended order; stock stays at zero
        assert!(service.list_orders().await.unwrap().is_empty());
        let products = service.list_products().await.unwrap();
        assert_eq!(products[0].stock_retail, 0);
    }

    #[tokio::test]
    async fn test_failed_compensation_reports_partial_failure() {
        // When the compensating delete cannot find the order, the books
        // have diverged: the caller gets the order id for manual repair.
        let service = test_service().await;

        let order = Order {
            id: "phantom-order".to_string(),
            product_name: "Château Test".to_string(),
            total_cents: 12_000,
            tax: None,
            channel: ChannelKind::Terminal,
            channel_label: "Venda Terminal".to_string(),
            fiscal_reference: None,
            created_at: Utc::now(),
        };

        let conflict = StoreError::StockConflict {
            product_id: "p1".to_string(),
            name: "Château Test".to_string(),
            available: 0,
            requested: 1,
        };

        let err = service.compensate(&order, conflict).await.unwrap_err();
        assert!(
            matches!(err, FulfillmentError::PartialFailure { order_id } if order_id == "phantom-order")
        );
    }

    #[tokio::test]
    async fn test_fulfill_ticks_both_feeds() {
        let service = test_service().await;
        let product = service.create_product(chateau_test(2)).await.unwrap();

        let mut inventory_rx = service.subscribe_inventory();
        let mut orders_rx = service.subscribe_orders();
        inventory_rx.borrow_and_update();
        orders_rx.borrow_and_update();

        service
            .fulfill(&product.id, ChannelKind::Terminal, "Venda Terminal", false)
            .await
            .unwrap();

        inventory_rx.changed().await.unwrap();
        orders_rx.changed().await.unwrap();
    }

    #[test]
    fn test_fiscal_reference_format() {
        let reference = generate_fiscal_reference();
        assert!(reference.starts_with("TX-"));
        assert_eq!(reference.len(), 9);
        assert!(reference[3..]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }
}
