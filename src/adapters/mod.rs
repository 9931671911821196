//! Adapters - Implementations of port interfaces.
//!
//! - `cache` - Cart cache backends (Redis, in-process)
//! - `in_memory` - Catalog, user and order stores with JSON seeding
//! - `komoju` - Payment gateway client and webhook verification
//! - `notification` - Order notifier
//! - `runtime` - Clocks and the background task executor
//! - `http` - Axum REST surface

pub mod cache;
pub mod http;
pub mod in_memory;
pub mod komoju;
pub mod notification;
pub mod runtime;

pub use cache::{InMemoryCartCache, RedisCartCache};
pub use in_memory::{InMemoryCatalog, InMemoryOrders, InMemoryUsers, SeedData, SeedError};
pub use komoju::{KomojuClient, KomojuConfig, WebhookVerifier};
pub use notification::LoggingNotifier;
pub use runtime::{FixedClock, SystemClock, TrackedExecutor};
