//! # Inventory Operations
//!
//! Product registration and catalog snapshots. Validation happens here, at
//! the boundary, so the store only ever sees well-formed input.

use tokio::sync::watch;
use tracing::{debug, info};

use sudvie_core::validation;
use sudvie_core::Product;
use sudvie_store::NewProduct;

use crate::error::ServiceResult;
use crate::Service;

/// Input for registering a new wine.
#[derive(Debug, Clone)]
pub struct CreateProductInput {
    pub name: String,
    /// Price in centavos.
    pub price_cents: i64,
    /// Optional encoded label still, passed through opaquely.
    pub image: Option<String>,
    /// Initial units at the retail terminal.
    pub stock_retail: i64,
    /// Initial units at the origin warehouse.
    pub stock_warehouse: i64,
}

impl Service {
    /// Registers a new product in the inventory.
    ///
    /// ## Rules
    /// - Name must be non-empty (after trimming) and within length bounds
    /// - Price and both stock counters must be non-negative; zero is valid
    /// - The store assigns the id and creation timestamp
    pub async fn create_product(&self, input: CreateProductInput) -> ServiceResult<Product> {
        validation::validate_product_name(&input.name)?;
        validation::validate_price_cents(input.price_cents)?;
        validation::validate_stock("stock_retail", input.stock_retail)?;
        validation::validate_stock("stock_warehouse", input.stock_warehouse)?;

        let name = input.name.trim().to_string();
        debug!(name = %name, price_cents = input.price_cents, "Registering product");

        let new = NewProduct {
            name,
            price_cents: input.price_cents,
            image: input.image,
            stock_retail: input.stock_retail,
            stock_warehouse: input.stock_warehouse,
        };

        let repo = self.store().inventory();
        let product = self
            .status()
            .run_with_retry(&self.config().retry, || {
                let repo = repo.clone();
                let new = new.clone();
                async move { repo.insert(new).await }
            })
            .await?;

        info!(id = %product.id, name = %product.name, "Product registered");
        Ok(product)
    }

    /// Returns the full inventory snapshot, ordered by name.
    pub async fn list_products(&self) -> ServiceResult<Vec<Product>> {
        let repo = self.store().inventory();
        self.status()
            .run_with_retry(&self.config().retry, || {
                let repo = repo.clone();
                async move { repo.list().await }
            })
            .await
    }

    /// Subscribes to inventory changes. Each tick means "re-fetch the
    /// snapshot"; re-fetching on a stale tick is harmless.
    pub fn subscribe_inventory(&self) -> watch::Receiver<u64> {
        self.store().inventory_feed().subscribe()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
