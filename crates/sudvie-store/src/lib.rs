//! # Sudvie Store - Storage Layer
//!
//! SQLite persistence for the Sudvie wine-import core.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          sudvie-store                                   │
//! │                                                                         │
//! │  ┌───────────────┐    ┌──────────────────┐    ┌───────────────────┐    │
//! │  │     pool      │    │    repository    │    │     listener      │    │
//! │  │  ───────────  │    │  ──────────────  │    │  ───────────────  │    │
//! │  │  Store        │───▶│  Inventory       │───▶│  ChangeFeed       │    │
//! │  │  StoreConfig  │    │  Ledger          │    │  (watch channel)  │    │
//! │  └───────────────┘    └──────────────────┘    └───────────────────┘    │
//! │          │                     │                                        │
//! │          ▼                     ▼                                        │
//! │  ┌───────────────┐    ┌──────────────────┐                             │
//! │  │  migrations   │    │      error       │                             │
//! │  │  (embedded)   │    │  StoreError      │                             │
//! │  └───────────────┘    └──────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use sudvie_store::{Store, StoreConfig};
//!
//! let store = Store::new(StoreConfig::new("/var/lib/sudvie/sudvie.db")).await?;
//! let products = store.inventory().list().await?;
//! ```

pub mod error;
pub mod listener;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{StoreError, StoreResult};
pub use listener::ChangeFeed;
pub use pool::{Store, StoreConfig};
pub use repository::inventory::{InventoryRepository, NewProduct};
pub use repository::ledger::LedgerRepository;
