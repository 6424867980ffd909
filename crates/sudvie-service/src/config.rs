//! # Service Configuration
//!
//! Tunables the deployment chooses per terminal. Everything here has a
//! sensible default so `ServiceConfig::default()` is a working setup.

use std::time::Duration;

use sudvie_core::DEFAULT_LOW_STOCK_THRESHOLD;

/// Retry policy for transient connectivity failures.
///
/// ## Rules
/// - Only connectivity errors are retried; business outcomes (out of
///   stock, not found) never are
/// - Delay doubles per attempt starting from `base_delay`
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first. 1 disables retry.
    pub max_attempts: u32,

    /// Delay before the first retry.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    /// Backoff before retry number `attempt` (1-based): base × 2^(attempt-1).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// Service-level configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Inclusive retail-stock level at or below which a product counts as
    /// low stock in metrics.
    pub low_stock_threshold: i64,

    /// Retry policy for store connectivity failures.
    pub retry: RetryPolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            retry: RetryPolicy::default(),
        }
    }
}

impl ServiceConfig {
    /// Sets the low-stock threshold.
    pub fn low_stock_threshold(mut self, threshold: i64) -> Self {
        self.low_stock_threshold = threshold;
        self
    }

    /// Sets the retry policy.
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.low_stock_threshold, 5);
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn test_backoff_doubles() {
        let retry = RetryPolicy {
            max_attempts: 4,
            base_delay: Duration::from_millis(100),
        };
        assert_eq!(retry.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(retry.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(retry.delay_for_attempt(3), Duration::from_millis(400));
    }
}
