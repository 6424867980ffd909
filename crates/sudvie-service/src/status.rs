//! # Connectivity Status
//!
//! Tracks whether the store is reachable and exposes it on a watch channel
//! so surfaces can show an "offline" badge without polling.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Active ──(connectivity error after retries)──▶ Degraded              │
//! │   Degraded ──(any store operation succeeds)────▶ Active                │
//! │                                                                         │
//! │  Degraded is advisory: reads keep serving the last snapshot, writes    │
//! │  keep failing fast with Connectivity until the store comes back.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;
use tokio::sync::watch;
use tracing::{debug, warn};

use sudvie_store::StoreError;

use crate::config::RetryPolicy;
use crate::error::FulfillmentError;

/// Whether the store is currently reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreHealth {
    /// Normal operation.
    Active,
    /// Connectivity lost; operating on last known snapshots.
    Degraded,
}

/// Shared handle onto the health channel. Cheap to clone.
#[derive(Debug, Clone)]
pub struct StatusHandle {
    tx: watch::Sender<StoreHealth>,
}

impl StatusHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(StoreHealth::Active);
        StatusHandle { tx }
    }

    /// Current health.
    pub fn health(&self) -> StoreHealth {
        *self.tx.borrow()
    }

    /// Subscribes to health transitions.
    pub fn subscribe(&self) -> watch::Receiver<StoreHealth> {
        self.tx.subscribe()
    }

    fn set(&self, health: StoreHealth) {
        self.tx.send_if_modified(|current| {
            if *current == health {
                false
            } else {
                *current = health;
                true
            }
        });
    }

    /// Runs a store operation under the retry policy.
    ///
    /// ## Rules
    /// - Connectivity errors are retried with doubling backoff, up to
    ///   `policy.max_attempts` total attempts
    /// - Any success flips health back to Active
    /// - Exhausted retries flip health to Degraded
    /// - Non-connectivity errors pass through untouched on the first try
    pub async fn run_with_retry<T, F, Fut>(
        &self,
        policy: &RetryPolicy,
        operation: F,
    ) -> Result<T, FulfillmentError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(value) => {
                    self.set(StoreHealth::Active);
                    return Ok(value);
                }
                Err(err) if err.is_connectivity() && attempt < policy.max_attempts => {
                    let delay = policy.delay_for_attempt(attempt);
                    debug!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Store unreachable, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) if err.is_connectivity() => {
                    warn!(attempts = attempt, error = %err, "Store unreachable, giving up");
                    self.set(StoreHealth::Degraded);
                    return Err(FulfillmentError::Connectivity(err.to_string()));
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

impl Default for StatusHandle {
    fn default() -> Self {
        Self::new()
    }
}
