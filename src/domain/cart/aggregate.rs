//! Cart aggregate.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use thiserror::Error;

use super::basket::Basket;
use crate::domain::catalog::Product;
use crate::domain::foundation::{CoordinatorId, ProductId, ServiceError, SessionId, Timestamp};

/// Box number that selects every basket.
pub const ALL_BOXES: u32 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(i64),

    #[error("insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },
}

impl From<CartError> for ServiceError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::InvalidQuantity(_) => ServiceError::InvalidArgument(err.to_string()),
            CartError::InsufficientStock { .. } => {
                ServiceError::FailedPrecondition(err.to_string())
            }
        }
    }
}

/// A session's shopping cart.
///
/// Invariant: `expired_at == updated_at + ttl` after every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub session_id: SessionId,
    pub baskets: Vec<Basket>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub expired_at: Timestamp,
}

impl Cart {
    /// Creates an empty cart that expires `ttl` after `now`.
    pub fn new(session_id: SessionId, now: Timestamp, ttl: Duration) -> Self {
        Self {
            session_id,
            baskets: Vec::new(),
            created_at: now,
            updated_at: now,
            expired_at: now.plus(ttl),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.baskets.is_empty()
    }

    /// Returns true once `expired_at` has been reached.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        !now.is_before(&self.expired_at)
    }

    /// Returns true when the cart was last refreshed more than `interval` ago.
    pub fn is_stale(&self, now: Timestamp, interval: Duration) -> bool {
        now.is_after(&self.updated_at.plus(interval))
    }

    /// Every product referenced by the cart, in first-seen order.
    pub fn product_ids(&self) -> Vec<ProductId> {
        let mut seen = HashSet::new();
        self.baskets
            .iter()
            .flat_map(|b| b.items.iter())
            .filter(|item| seen.insert(item.product_id.clone()))
            .map(|item| item.product_id.clone())
            .collect()
    }

    fn next_box_number(&self) -> u32 {
        self.baskets.iter().map(|b| b.box_number).max().unwrap_or(0) + 1
    }

    /// Adds `quantity` units of `product`.
    ///
    /// The item joins the first basket of the same coordinator and box type
    /// that can take it, or a new basket. `products` must hold every product
    /// already in the cart so occupancy can be computed. Returns the box
    /// number the item landed in. Nothing changes on error.
    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: i64,
        products: &HashMap<ProductId, Product>,
    ) -> Result<u32, CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        if !product.has_stock_for(quantity) {
            return Err(CartError::InsufficientStock {
                product_id: product.id.clone(),
                requested: quantity,
                available: product.inventory,
            });
        }

        let target = self
            .baskets
            .iter()
            .position(|b| b.accepts(product) && b.can_fit(product, quantity, products));

        let held = target
            .map(|i| self.baskets[i].quantity_of(&product.id))
            .unwrap_or(0);
        let requested = held.saturating_add(quantity);
        if !product.has_stock_for(requested) {
            return Err(CartError::InsufficientStock {
                product_id: product.id.clone(),
                requested,
                available: product.inventory,
            });
        }

        let index = match target {
            Some(i) => i,
            None => {
                let basket = Basket::new(
                    self.next_box_number(),
                    product.coordinator_id.clone(),
                    product.box_type(),
                );
                self.baskets.push(basket);
                self.baskets.len() - 1
            }
        };
        self.baskets[index].add(&product.id, quantity);
        Ok(self.baskets[index].box_number)
    }

    /// Removes `product_id` from basket `box_number`, or from every basket
    /// when `box_number` is [`ALL_BOXES`]. Returns true when something changed.
    pub fn remove_item(&mut self, product_id: &ProductId, box_number: u32) -> bool {
        let mut removed = false;
        for basket in self
            .baskets
            .iter_mut()
            .filter(|b| box_number == ALL_BOXES || b.box_number == box_number)
        {
            removed |= basket.remove(product_id);
        }
        self.baskets.retain(|b| !b.is_empty());
        removed
    }

    /// Baskets of `coordinator_id` matching `box_number` ([`ALL_BOXES`] selects all).
    pub fn baskets_for(&self, coordinator_id: &CoordinatorId, box_number: u32) -> Vec<&Basket> {
        self.baskets
            .iter()
            .filter(|b| &b.coordinator_id == coordinator_id)
            .filter(|b| box_number == ALL_BOXES || b.box_number == box_number)
            .collect()
    }

    /// Drops the baskets whose number is listed.
    pub fn remove_baskets(&mut self, box_numbers: &[u32]) {
        self.baskets.retain(|b| !box_numbers.contains(&b.box_number));
    }

    /// Re-applies current product data and extends the expiry.
    ///
    /// Unpublished or missing products are dropped, every basket is resized,
    /// empty baskets are removed. Box numbers are left as they are.
    pub fn refresh(
        &mut self,
        products: &HashMap<ProductId, Product>,
        now: Timestamp,
        ttl: Duration,
    ) {
        for basket in &mut self.baskets {
            basket.retain_published(products);
            basket.resize(products);
        }
        self.baskets.retain(|b| !b.is_empty());
        self.touch(now, ttl);
    }

    fn touch(&mut self, now: Timestamp, ttl: Duration) {
        self.updated_at = now;
        self.expired_at = now.plus(ttl);
    }
}
