//! # Service Error Types
//!
//! The error surface callers of the service facade see.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Translation                                    │
//! │                                                                         │
//! │  StoreError::NotFound (Product)  →  FulfillmentError::ProductNotFound  │
//! │  StoreError::StockConflict       →  FulfillmentError::OutOfStock       │
//! │  StoreError (connectivity)       →  FulfillmentError::Connectivity     │
//! │  ValidationError                 →  FulfillmentError::Validation       │
//! │  compensation failed             →  FulfillmentError::PartialFailure   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use sudvie_core::ValidationError;
use sudvie_store::StoreError;

/// Errors surfaced by service operations.
#[derive(Debug, Error)]
pub enum FulfillmentError {
    /// The requested product does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Retail stock is exhausted (or another terminal won the race for the
    /// last unit).
    #[error("Out of stock: {name}")]
    OutOfStock { name: String },

    /// Input rejected at the boundary.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The order was appended but the paired stock decrement failed AND the
    /// compensating delete also failed. The ledger holds an order with no
    /// matching stock movement; the id is reported for manual repair.
    #[error("Partial failure: order {order_id} is recorded but stock was not decremented")]
    PartialFailure { order_id: String },

    /// The store is unreachable. The terminal keeps operating on its last
    /// snapshot in degraded mode.
    #[error("Store connectivity lost: {0}")]
    Connectivity(String),

    /// Any other storage failure.
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for FulfillmentError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } if entity == "Product" => {
                FulfillmentError::ProductNotFound(id)
            }
            StoreError::StockConflict { name, .. } => FulfillmentError::OutOfStock { name },
            e if e.is_connectivity() => FulfillmentError::Connectivity(e.to_string()),
            other => FulfillmentError::Store(other),
        }
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, FulfillmentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_not_found_translation() {
        let err: FulfillmentError = StoreError::not_found("Product", "p1").into();
        assert!(matches!(err, FulfillmentError::ProductNotFound(id) if id == "p1"));
    }

    #[test]
    fn test_stock_conflict_becomes_out_of_stock_with_product_name() {
        let err: FulfillmentError = StoreError::StockConflict {
            product_id: "p1".into(),
            name: "Château Test".into(),
            available: 0,
            requested: 1,
        }
        .into();
        assert!(matches!(err, FulfillmentError::OutOfStock { ref name } if name == "Château Test"));
        assert_eq!(err.to_string(), "Out of stock: Château Test");
    }

    #[test]
    fn test_connectivity_translation() {
        let err: FulfillmentError = StoreError::PoolExhausted.into();
        assert!(matches!(err, FulfillmentError::Connectivity(_)));
    }
}
