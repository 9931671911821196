//! Basket: one box worth of items from a single coordinator.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::boxes::{BoxSize, BoxType, BOX_CAPACITY};
use crate::domain::catalog::Product;
use crate::domain::foundation::{CoordinatorId, ProductId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Items sharing one coordinator and one box type.
///
/// `box_size` and `box_rate` are derived state, recomputed by [`Basket::resize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Basket {
    pub box_number: u32,
    pub box_type: BoxType,
    pub box_size: BoxSize,
    pub box_rate: i64,
    pub coordinator_id: CoordinatorId,
    pub items: Vec<CartItem>,
}

impl Basket {
    pub(crate) fn new(box_number: u32, coordinator_id: CoordinatorId, box_type: BoxType) -> Self {
        Self {
            box_number,
            box_type,
            box_size: BoxSize::Size60,
            box_rate: 0,
            coordinator_id,
            items: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Quantity of `product_id` held in this basket, 0 when absent.
    pub fn quantity_of(&self, product_id: &ProductId) -> i64 {
        self.items
            .iter()
            .find(|item| &item.product_id == product_id)
            .map(|item| item.quantity)
            .unwrap_or(0)
    }

    /// Occupancy percentage at `size`. Items whose product is unknown count as zero.
    /// Saturates at `i64::MAX`.
    pub fn occupancy(&self, size: BoxSize, products: &HashMap<ProductId, Product>) -> i64 {
        self.items
            .iter()
            .filter_map(|item| {
                products
                    .get(&item.product_id)
                    .map(|p| item.quantity.saturating_mul(p.box_rate(size)))
            })
            .fold(0, i64::saturating_add)
    }

    /// Returns true when `product` belongs in this kind of basket.
    pub fn accepts(&self, product: &Product) -> bool {
        self.coordinator_id == product.coordinator_id && self.box_type == product.box_type()
    }

    /// Returns true when `quantity` more units of `product` still fit in the largest box.
    pub fn can_fit(
        &self,
        product: &Product,
        quantity: i64,
        products: &HashMap<ProductId, Product>,
    ) -> bool {
        let size = BoxSize::largest();
        let added = quantity.saturating_mul(product.box_rate(size));
        self.occupancy(size, products).saturating_add(added) <= BOX_CAPACITY
    }

    pub(crate) fn add(&mut self, product_id: &ProductId, quantity: i64) {
        match self.items.iter_mut().find(|item| &item.product_id == product_id) {
            Some(item) => item.quantity += quantity,
            None => self.items.push(CartItem {
                product_id: product_id.clone(),
                quantity,
            }),
        }
    }

    /// Removes every line of `product_id`. Returns true when something was removed.
    pub(crate) fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.product_id != product_id);
        self.items.len() != before
    }

    /// Drops items whose product is missing or no longer published.
    pub(crate) fn retain_published(&mut self, products: &HashMap<ProductId, Product>) {
        self.items.retain(|item| {
            products
                .get(&item.product_id)
                .map(Product::is_published)
                .unwrap_or(false)
        });
    }

    /// Picks the smallest box the items fit in, or the largest when none does.
    pub(crate) fn resize(&mut self, products: &HashMap<ProductId, Product>) {
        let size = BoxSize::ALL
            .into_iter()
            .find(|size| self.occupancy(*size, products) <= BOX_CAPACITY)
            .unwrap_or_else(BoxSize::largest);
        self.box_size = size;
        self.box_rate = self.occupancy(size, products);
    }
}
