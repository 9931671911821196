//! Cart handlers.
//!
//! ## Queries
//! - Get the session's cart
//!
//! ## Commands
//! - Add an item
//! - Remove an item

mod add_cart_item;
mod cart_store;
mod get_cart;
mod remove_cart_item;

pub use add_cart_item::{AddCartItemCommand, AddCartItemHandler, AddCartItemResult};
pub use cart_store::{CartSettings, CartStore};
pub use get_cart::{GetCartHandler, GetCartQuery, GetCartResult};
pub use remove_cart_item::{RemoveCartItemCommand, RemoveCartItemHandler, RemoveCartItemResult};
