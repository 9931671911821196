//! Product snapshot as read from the store database.

use serde::{Deserialize, Serialize};

use crate::domain::cart::{BoxSize, BoxType};
use crate::domain::foundation::{CoordinatorId, ProductId};

/// Temperature class a product ships in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryType {
    Normal,
    Refrigerated,
    Frozen,
}

impl From<DeliveryType> for BoxType {
    fn from(delivery: DeliveryType) -> Self {
        match delivery {
            DeliveryType::Normal => BoxType::Normal,
            DeliveryType::Refrigerated => BoxType::Refrigerated,
            DeliveryType::Frozen => BoxType::Frozen,
        }
    }
}

/// A sellable product.
///
/// `box*_rate` is the percentage of a box of that size one unit occupies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub coordinator_id: CoordinatorId,
    pub name: String,
    /// Unit price in yen, before tax.
    pub price: i64,
    /// Units currently available.
    pub inventory: i64,
    pub public: bool,
    pub deleted: bool,
    pub delivery_type: DeliveryType,
    pub box60_rate: i64,
    pub box80_rate: i64,
    pub box100_rate: i64,
}

impl Product {
    /// Returns true when the product is publicly listed and not deleted.
    pub fn is_published(&self) -> bool {
        self.public && !self.deleted
    }

    /// Returns the per-unit occupancy percentage for a box size.
    pub fn box_rate(&self, size: BoxSize) -> i64 {
        match size {
            BoxSize::Size60 => self.box60_rate,
            BoxSize::Size80 => self.box80_rate,
            BoxSize::Size100 => self.box100_rate,
        }
    }

    /// Returns the box type this product must travel in.
    pub fn box_type(&self) -> BoxType {
        self.delivery_type.into()
    }

    /// Returns true when `quantity` units can be supplied from current stock.
    pub fn has_stock_for(&self, quantity: i64) -> bool {
        quantity <= self.inventory
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Published normal-temperature product with generous stock.
    pub fn product(id: &str, coordinator: &str) -> Product {
        Product {
            id: ProductId::new(id).unwrap(),
            coordinator_id: CoordinatorId::new(coordinator).unwrap(),
            name: format!("product {}", id),
            price: 500,
            inventory: 10,
            public: true,
            deleted: false,
            delivery_type: DeliveryType::Normal,
            box60_rate: 50,
            box80_rate: 40,
            box100_rate: 25,
        }
    }
}
