//! Cart domain module.
//!
//! A cart groups items into baskets, one per shipping box. Baskets are
//! keyed by coordinator and box type and sized by product occupancy rates.
//!
//! # Module Structure
//!
//! - `aggregate` - Cart aggregate and its mutations
//! - `basket` - Basket and cart item
//! - `boxes` - Box size and box type

mod aggregate;
mod basket;
mod boxes;

pub use aggregate::{Cart, CartError, ALL_BOXES};
pub use basket::{Basket, CartItem};
pub use boxes::{BoxSize, BoxType, BOX_CAPACITY};
