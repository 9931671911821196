//! Cart configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Cart lifetime and storage settings
#[derive(Debug, Clone, Deserialize)]
pub struct CartConfig {
    /// Lifetime of an untouched cart, in seconds
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,

    /// Age after which a read refreshes the cart against the catalog, in seconds
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// Prefix of cache keys
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl CartConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.ttl_secs == 0 {
            return Err(ValidationError::InvalidCartTtl);
        }
        if self.refresh_interval_secs == 0 || self.refresh_interval_secs >= self.ttl_secs {
            return Err(ValidationError::InvalidRefreshInterval);
        }
        Ok(())
    }
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
            refresh_interval_secs: default_refresh_interval(),
            key_prefix: default_key_prefix(),
        }
    }
}

/// Two weeks
fn default_ttl() -> u64 {
    14 * 24 * 60 * 60
}

fn default_refresh_interval() -> u64 {
    600
}

fn default_key_prefix() -> String {
    "cart:".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_config_defaults() {
        let config = CartConfig::default();
        assert_eq!(config.ttl_secs, 1_209_600);
        assert_eq!(config.refresh_interval(), Duration::from_secs(600));
        assert_eq!(config.key_prefix, "cart:");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_ttl_is_invalid() {
        let config = CartConfig {
            ttl_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidCartTtl));
    }

    #[test]
    fn test_refresh_interval_must_be_shorter_than_ttl() {
        let config = CartConfig {
            ttl_secs: 600,
            refresh_interval_secs: 600,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidRefreshInterval)
        );
    }
}
