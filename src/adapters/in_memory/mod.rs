//! In-memory adapters for the catalog, users and orders.
//!
//! Used by the development binary and the integration tests. A JSON seed
//! file can populate the catalog and users at startup.

mod catalog;
mod orders;
mod seed;
mod users;

pub use catalog::InMemoryCatalog;
pub use orders::InMemoryOrders;
pub use seed::{SeedData, SeedError};
pub use users::InMemoryUsers;
