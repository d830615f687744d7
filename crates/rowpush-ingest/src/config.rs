//! Delivery configuration
//!
//! One [`DeliveryConfig`] is built at startup and handed to the engine;
//! nothing in the pipeline reads configuration from globals.

use rowpush_common::{Result, SyncError};
use std::time::Duration;

use crate::retry::RetryPolicy;

// ============================================================================
// Delivery Defaults
// ============================================================================

/// Records per HTTP request
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Retries after the first failed attempt of a chunk
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Delay before the first retry; doubles for every further retry
pub const DEFAULT_BASE_DELAY_SECS: f64 = 1.0;

/// Per-request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Chunking, retry and timeout settings for one delivery run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryConfig {
    pub chunk_size: usize,
    pub max_retries: u32,
    pub base_delay: Duration,
    pub timeout: Duration,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: Duration::from_secs_f64(DEFAULT_BASE_DELAY_SECS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl DeliveryConfig {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build from the user-facing units (seconds as floats for delays)
    pub fn from_parts(
        chunk_size: usize,
        max_retries: u32,
        base_delay_secs: f64,
        timeout_secs: f64,
    ) -> Result<Self> {
        let config = Self {
            chunk_size,
            max_retries,
            base_delay: seconds("base_delay", base_delay_secs)?,
            timeout: seconds("timeout", timeout_secs)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings a run cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size < 1 {
            return Err(SyncError::invalid_configuration(format!(
                "chunk_size must be >= 1, got {}",
                self.chunk_size
            )));
        }
        if self.timeout.is_zero() {
            return Err(SyncError::invalid_configuration("timeout must be greater than zero"));
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.base_delay)
    }
}

fn seconds(name: &str, value: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(value).map_err(|_| {
        SyncError::invalid_configuration(format!(
            "{} must be a non-negative number of seconds, got {}",
            name, value
        ))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DeliveryConfig::default();
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.base_delay, Duration::from_secs(1));
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_parts() {
        let config = DeliveryConfig::from_parts(500, 0, 0.25, 5.0).unwrap();
        assert_eq!(config.chunk_size, 500);
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.base_delay, Duration::from_millis(250));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let err = DeliveryConfig::default().with_chunk_size(0).validate().unwrap_err();
        assert!(matches!(err, SyncError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_negative_delay_rejected() {
        assert!(DeliveryConfig::from_parts(10, 2, -1.0, 60.0).is_err());
        assert!(DeliveryConfig::from_parts(10, 2, f64::NAN, 60.0).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(DeliveryConfig::from_parts(10, 2, 1.0, 0.0).is_err());
    }
}
