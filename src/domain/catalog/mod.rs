//! Catalog snapshots consumed by checkout.
//!
//! Products, promotions and shipping configuration are owned by the store
//! database; this crate only reads them through repository ports.

mod product;
mod promotion;
mod shipping;

pub use product::{DeliveryType, Product};
pub use promotion::{DiscountType, Promotion};
pub use shipping::{Shipping, ShippingError, ShippingRate};

#[cfg(test)]
pub(crate) mod fixtures {
    pub use super::product::fixtures::product;
    pub use super::promotion::fixtures::promotion;
    pub use super::shipping::fixtures::shipping;
}
