//! Cart cache adapters.
//!
//! - `InMemoryCartCache` - single-process store for development and tests
//! - `RedisCartCache` - shared store with native key expiry

mod in_memory;
mod redis;

pub use self::redis::RedisCartCache;
pub use in_memory::InMemoryCartCache;
