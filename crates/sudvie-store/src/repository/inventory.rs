//! # Inventory Repository
//!
//! Database operations for the wine inventory collection.
//!
//! ## Stock Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Two-Location Stock                                   │
//! │                                                                         │
//! │  stock_retail     ← the selling floor; every fulfillment draws here    │
//! │  stock_warehouse  ← import pipeline; informational, never decremented  │
//! │                                                                         │
//! │  decrement_stock_retail is CONDITIONAL: the UPDATE carries the         │
//! │  availability check in its WHERE clause, so two concurrent sales of    │
//! │  the last bottle resolve to exactly one winner inside SQLite.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use sudvie_core::Product;

use crate::error::{StoreError, StoreResult};
use crate::listener::ChangeFeed;

/// Fields accepted when registering a new product. The store assigns the
/// id and creation timestamp.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price_cents: i64,
    pub image: Option<String>,
    pub stock_retail: i64,
    pub stock_warehouse: i64,
}

/// Repository for inventory operations.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
    feed: Arc<ChangeFeed>,
}

impl InventoryRepository {
    pub fn new(pool: SqlitePool, feed: Arc<ChangeFeed>) -> Self {
        InventoryRepository { pool, feed }
    }

    /// Generates a new product ID.
    pub fn generate_product_id() -> String {
        Uuid::new_v4().to_string()
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Inserts a new product and returns it with its assigned id and
    /// timestamp. Notifies the inventory feed on success.
    pub async fn insert(&self, new: NewProduct) -> StoreResult<Product> {
        let product = Product {
            id: Self::generate_product_id(),
            name: new.name,
            price_cents: new.price_cents,
            image: new.image,
            stock_retail: new.stock_retail,
            stock_warehouse: new.stock_warehouse,
            created_at: Utc::now(),
        };

        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO inventory (id, name, price_cents, image, stock_retail, stock_warehouse, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(&product.image)
        .bind(product.stock_retail)
        .bind(product.stock_warehouse)
        .bind(product.created_at)
        .execute(&self.pool)
        .await?;

        info!(id = %product.id, name = %product.name, "Product registered");
        self.feed.notify();

        Ok(product)
    }

    // =========================================================================
    // Read
    // =========================================================================

    /// Lists the full inventory, ordered by name. This is the snapshot that
    /// feed subscribers re-fetch after each tick.
    pub async fn list(&self) -> StoreResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents, image, stock_retail, stock_warehouse, created_at
            FROM inventory
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed inventory");
        Ok(products)
    }

    /// Fetches a single product by ID.
    pub async fn get_by_id(&self, id: &str) -> StoreResult<Product> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents, image, stock_retail, stock_warehouse, created_at
            FROM inventory
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::not_found("Product", id))
    }

    // =========================================================================
    // Stock Mutation
    // =========================================================================

    /// Atomically decrements retail stock, failing if fewer than `amount`
    /// units remain.
    ///
    /// ## Rules
    /// - The availability check lives in the WHERE clause: the row is only
    ///   touched when `stock_retail >= amount`
    /// - The updated row comes back via RETURNING in the same statement, so
    ///   an error return always means nothing committed
    /// - No row back means either the product does not exist or the stock
    ///   gate failed; a follow-up read disambiguates
    pub async fn decrement_stock_retail(&self, id: &str, amount: i64) -> StoreResult<Product> {
        debug!(id = %id, amount, "Decrementing retail stock");

        let updated = sqlx::query_as::<_, Product>(
            r#"
            UPDATE inventory
            SET stock_retail = stock_retail - ?2
            WHERE id = ?1 AND stock_retail >= ?2
            RETURNING id, name, price_cents, image, stock_retail, stock_warehouse, created_at
            "#,
        )
        .bind(id)
        .bind(amount)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(product) => {
                self.feed.notify();
                Ok(product)
            }
            None => {
                // Nothing committed. Re-read to report missing vs under-stocked.
                let current = self.get_by_id(id).await?;
                warn!(
                    id = %id,
                    available = current.stock_retail,
                    requested = amount,
                    "Stock conflict on decrement"
                );
                Err(StoreError::StockConflict {
                    product_id: id.to_string(),
                    name: current.name,
                    available: current.stock_retail,
                    requested: amount,
                })
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Store, StoreConfig};

    async fn test_store() -> Store {
        Store::new(StoreConfig::in_memory()).await.unwrap()
    }

    fn sample(name: &str, retail: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price_cents: 12_000,
            image: None,
            stock_retail: retail,
            stock_warehouse: 50,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = test_store().await;
        let repo = store.inventory();

        let inserted = repo.insert(sample("Château Margaux", 12)).await.unwrap();
        let fetched = repo.get_by_id(&inserted.id).await.unwrap();

        assert_eq!(fetched.name, "Château Margaux");
        assert_eq!(fetched.price_cents, 12_000);
        assert_eq!(fetched.stock_retail, 12);
        assert_eq!(fetched.stock_warehouse, 50);
    }

    #[tokio::test]
    async fn test_list_is_sorted_by_name() {
        let store = test_store().await;
        let repo = store.inventory();

        repo.insert(sample("Syrah", 1)).await.unwrap();
        repo.insert(sample("Bordeaux", 1)).await.unwrap();
        repo.insert(sample("Malbec", 1)).await.unwrap();

        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Bordeaux", "Malbec", "Syrah"]);
    }

    #[tokio::test]
    async fn test_get_missing_product() {
        let store = test_store().await;
        let err = store.inventory().get_by_id("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_decrement_happy_path() {
        let store = test_store().await;
        let repo = store.inventory();

        let product = repo.insert(sample("Pinot Noir", 3)).await.unwrap();
        let updated = repo.decrement_stock_retail(&product.id, 1).await.unwrap();

        assert_eq!(updated.stock_retail, 2);
    }

    #[tokio::test]
    async fn test_decrement_refuses_overdraw() {
        let store = test_store().await;
        let repo = store.inventory();

        let product = repo.insert(sample("Riesling", 1)).await.unwrap();
        let err = repo
            .decrement_stock_retail(&product.id, 2)
            .await
            .unwrap_err();

        match err {
            StoreError::StockConflict {
                name,
                available,
                requested,
                ..
            } => {
                assert_eq!(name, "Riesling");
                assert_eq!(available, 1);
                assert_eq!(requested, 2);
            }
            other => panic!("expected StockConflict, got {other:?}"),
        }

        // Untouched: conditional update is all-or-nothing
        let current = repo.get_by_id(&product.id).await.unwrap();
        assert_eq!(current.stock_retail, 1);
    }

    #[tokio::test]
    async fn test_errored_decrement_means_nothing_committed() {
        // If the pool cannot serve the statement, the call must fail
        // without touching the row: the caller uses an error return as
        // proof that no decrement happened.
        let mut config = StoreConfig::in_memory();
        config.connect_timeout = std::time::Duration::from_millis(50);
        let store = Store::new(config).await.unwrap();
        let repo = store.inventory();
        let product = repo.insert(sample("Chenin Blanc", 2)).await.unwrap();

        // Hold the pool's only connection so the decrement cannot reach SQLite
        let held = store.pool().acquire().await.unwrap();
        let err = repo.decrement_stock_retail(&product.id, 1).await.unwrap_err();
        assert!(err.is_connectivity());
        drop(held);

        let current = repo.get_by_id(&product.id).await.unwrap();
        assert_eq!(current.stock_retail, 2);
    }

    #[tokio::test]
    async fn test_successful_decrement_returns_updated_row() {
        // The post-decrement count comes back from the write itself, not
        // from a second read that could fail independently.
        let store = test_store().await;
        let repo = store.inventory();

        let product = repo.insert(sample("Sancerre", 5)).await.unwrap();
        let updated = repo.decrement_stock_retail(&product.id, 3).await.unwrap();

        assert_eq!(updated.id, product.id);
        assert_eq!(updated.name, "Sancerre");
        assert_eq!(updated.stock_retail, 2);
        assert_eq!(updated.stock_warehouse, 50);
    }

    #[tokio::test]
    async fn test_decrement_missing_product_is_not_found() {
        let store = test_store().await;
        let err = store
            .inventory()
            .decrement_stock_retail("ghost", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_writes_notify_feed() {
        let store = test_store().await;
        let repo = store.inventory();
        let mut rx = store.inventory_feed().subscribe();

        let product = repo.insert(sample("Gamay", 2)).await.unwrap();
        rx.changed().await.unwrap();

        repo.decrement_stock_retail(&product.id, 1).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 2);
    }
}
