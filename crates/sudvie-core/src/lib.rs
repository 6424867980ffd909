//! # sudvie-core: Pure Business Logic for the Sudvie Import Core
//!
//! The heart of the system: money, tax, metrics and domain types as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sudvie Nexus Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Presentation layer (external)                      │   │
//! │  │   Dashboard ──► Entry Form ──► Terminal ──► Order Ledger        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    sudvie-service                               │   │
//! │  │    create_product, fulfill, list_orders, metrics, health        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ sudvie-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │    tax    │  │  metrics  │  │   │
//! │  │   │  Product  │  │   Money   │  │ Breakdown │  │ aggregate │  │   │
//! │  │   │   Order   │  │  Micros   │  │  18/6.5/  │  │ low-stock │  │   │
//! │  │   │  Channel  │  │  TaxRate  │  │  9.25 %   │  │ channels  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    sudvie-store (SQLite layer)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, ChannelKind)
//! - [`money`] - Integer money: centavos for prices, micro-reais for tax
//! - [`tax`] - Fixed-rate tax breakdown
//! - [`metrics`] - Pure aggregation over store snapshots
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod metrics;
pub mod money;
pub mod tax;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use metrics::{
    compute_metrics, sort_orders_for_display, ChannelMetrics, MetricsSnapshot,
    DEFAULT_LOW_STOCK_THRESHOLD,
};
pub use money::{Micros, Money, TaxRate};
pub use tax::TaxBreakdown;
pub use types::{ChannelKind, Order, Product};
