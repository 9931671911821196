//! Application configuration module
//!
//! Configuration is loaded from environment variables with the `MARCHE`
//! prefix. Nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use marche_checkout::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod cart;
mod checkout;
mod error;
mod payment;
mod redis;
mod server;
mod store;

pub use cart::CartConfig;
pub use checkout::CheckoutConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use redis::RedisConfig;
pub use server::{Environment, ServerConfig};
pub use store::StoreConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Redis configuration (cart cache)
    #[serde(default)]
    pub redis: RedisConfig,

    /// Cart lifetime settings
    #[serde(default)]
    pub cart: CartConfig,

    /// Checkout orchestration settings
    #[serde(default)]
    pub checkout: CheckoutConfig,

    /// Payment configuration (KOMOJU)
    #[serde(default)]
    pub payment: PaymentConfig,

    /// In-memory store seeding
    #[serde(default)]
    pub store: StoreConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads `MARCHE__SECTION__KEY` variables.
    ///
    /// - `MARCHE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `MARCHE__PAYMENT__SECRET_KEY=...` -> `payment.secret_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MARCHE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.redis.validate()?;
        self.cart.validate()?;
        self.checkout.validate()?;
        self.payment.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
