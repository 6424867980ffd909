//! # Sudvie Service - Business Operations
//!
//! The facade front-of-house surfaces call into. Every operation takes an
//! explicitly injected [`Store`]; nothing in this crate reaches for a
//! global.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          sudvie-service                                 │
//! │                                                                         │
//! │  ┌───────────────┐  ┌────────────────┐  ┌────────────────────┐         │
//! │  │   inventory   │  │  fulfillment   │  │      metrics       │         │
//! │  │  ───────────  │  │  ────────────  │  │  ────────────────  │         │
//! │  │  create       │  │  fulfill saga  │  │  list_orders       │         │
//! │  │  list         │  │  compensation  │  │  metrics snapshot  │         │
//! │  │  subscribe    │  │  subscribe     │  │                    │         │
//! │  └───────┬───────┘  └───────┬────────┘  └─────────┬──────────┘         │
//! │          │                  │                     │                     │
//! │          └──────────────────┼─────────────────────┘                     │
//! │                             ▼                                           │
//! │                  ┌────────────────────┐    ┌───────────────────┐        │
//! │                  │   status (retry,   │    │      config       │        │
//! │                  │   health channel)  │    │  threshold, retry │        │
//! │                  └─────────┬──────────┘    └───────────────────┘        │
//! │                            ▼                                            │
//! │                      sudvie-store                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use sudvie_service::{Service, ServiceConfig};
//! use sudvie_store::{Store, StoreConfig};
//!
//! let store = Store::new(StoreConfig::new("/var/lib/sudvie/sudvie.db")).await?;
//! let service = Service::new(store, ServiceConfig::default());
//!
//! let products = service.list_products().await?;
//! ```

pub mod config;
pub mod error;
pub mod fulfillment;
pub mod inventory;
pub mod metrics;
pub mod status;

pub use config::{RetryPolicy, ServiceConfig};
pub use error::{FulfillmentError, ServiceResult};
pub use fulfillment::Confirmation;
pub use inventory::CreateProductInput;
pub use status::{StatusHandle, StoreHealth};

use sudvie_store::Store;
use tokio::sync::watch;

/// The service facade. Cheap to clone; all clones share the same store
/// handle and health channel.
#[derive(Debug, Clone)]
pub struct Service {
    store: Store,
    config: ServiceConfig,
    status: StatusHandle,
}

impl Service {
    /// Creates a service over an already-connected store.
    pub fn new(store: Store, config: ServiceConfig) -> Self {
        Service {
            store,
            config,
            status: StatusHandle::new(),
        }
    }

    /// Current store health.
    pub fn health(&self) -> StoreHealth {
        self.status.health()
    }

    /// Subscribes to health transitions (Active ↔ Degraded).
    pub fn subscribe_health(&self) -> watch::Receiver<StoreHealth> {
        self.status.subscribe()
    }

    pub(crate) fn store(&self) -> &Store {
        &self.store
    }

    pub(crate) fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub(crate) fn status(&self) -> &StatusHandle {
        &self.status
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use sudvie_store::StoreConfig;

    /// In-memory service with default configuration. Honors `RUST_LOG` so
    /// a failing test can be re-run with store logging visible.
    pub async fn test_service() -> Service {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let store = Store::new(StoreConfig::in_memory())
            .await
            .expect("in-memory store");
        Service::new(store, ServiceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_support::test_service;

    #[tokio::test]
    async fn test_service_starts_active() {
        let service = test_service().await;
        assert_eq!(service.health(), StoreHealth::Active);
    }

    #[tokio::test]
    async fn test_clones_share_health() {
        let service = test_service().await;
        let clone = service.clone();
        assert_eq!(service.health(), clone.health());
    }
}
