//! Checkout configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutConfig {
    /// Upper bound on the concurrent lookups, in seconds
    #[serde(default = "default_lookup_timeout")]
    pub lookup_timeout_secs: u64,
}

impl CheckoutConfig {
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.lookup_timeout_secs == 0 || self.lookup_timeout_secs > 60 {
            return Err(ValidationError::InvalidLookupTimeout);
        }
        Ok(())
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            lookup_timeout_secs: default_lookup_timeout(),
        }
    }
}

fn default_lookup_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_config_defaults() {
        let config = CheckoutConfig::default();
        assert_eq!(config.lookup_timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lookup_timeout_bounds() {
        for secs in [0, 61] {
            let config = CheckoutConfig {
                lookup_timeout_secs: secs,
            };
            assert!(config.validate().is_err(), "{}", secs);
        }
    }
}
