//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamp, errors, state machine)
//! - `catalog` - Product, promotion and shipping snapshots
//! - `customer` - Customer profile and addresses
//! - `cart` - Cart aggregate, baskets and box sizing
//! - `order` - Order aggregate, pricing and payment lifecycle

pub mod cart;
pub mod catalog;
pub mod customer;
pub mod foundation;
pub mod order;
