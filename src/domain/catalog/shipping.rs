//! Shipping configuration and per-box fee calculation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::cart::{BoxSize, BoxType};
use crate::domain::foundation::{CoordinatorId, ShippingId};

/// One price tier, applied to the listed prefectures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingRate {
    pub number: i64,
    pub name: String,
    pub price: i64,
    pub prefecture_codes: Vec<i32>,
}

impl ShippingRate {
    pub fn covers(&self, prefecture_code: i32) -> bool {
        self.prefecture_codes.contains(&prefecture_code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShippingError {
    #[error("no shipping rate for size {size} boxes to prefecture {prefecture_code}")]
    RateNotFound { size: BoxSize, prefecture_code: i32 },
}

/// Shipping configuration of a coordinator, or the platform default when
/// `coordinator_id` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipping {
    pub id: ShippingId,
    pub coordinator_id: Option<CoordinatorId>,
    pub box60_rates: Vec<ShippingRate>,
    pub box60_cold: i64,
    pub box80_rates: Vec<ShippingRate>,
    pub box80_cold: i64,
    pub box100_rates: Vec<ShippingRate>,
    pub box100_cold: i64,
    pub has_free_shipping: bool,
    pub free_shipping_threshold: i64,
}

impl Shipping {
    pub fn is_default(&self) -> bool {
        self.coordinator_id.is_none()
    }

    fn rates_for(&self, size: BoxSize) -> (&[ShippingRate], i64) {
        match size {
            BoxSize::Size60 => (&self.box60_rates, self.box60_cold),
            BoxSize::Size80 => (&self.box80_rates, self.box80_cold),
            BoxSize::Size100 => (&self.box100_rates, self.box100_cold),
        }
    }

    /// Fee for one box: the first tier covering the prefecture, plus the
    /// cold chain surcharge for refrigerated and frozen boxes.
    pub fn box_fee(
        &self,
        size: BoxSize,
        box_type: BoxType,
        prefecture_code: i32,
    ) -> Result<i64, ShippingError> {
        let (rates, cold) = self.rates_for(size);
        let rate = rates
            .iter()
            .find(|r| r.covers(prefecture_code))
            .ok_or(ShippingError::RateNotFound {
                size,
                prefecture_code,
            })?;

        let surcharge = if box_type.is_cold_chain() { cold } else { 0 };
        Ok(rate.price + surcharge)
    }

    /// Returns true when an order of `subtotal` ships for free.
    pub fn is_free_for(&self, subtotal: i64) -> bool {
        self.has_free_shipping && subtotal >= self.free_shipping_threshold
    }

    /// Total shipping fee for a set of boxes.
    ///
    /// Tier lookup still runs for free orders, so an unreachable prefecture
    /// is reported either way.
    pub fn calc_fee<I>(
        &self,
        boxes: I,
        subtotal: i64,
        prefecture_code: i32,
    ) -> Result<i64, ShippingError>
    where
        I: IntoIterator<Item = (BoxSize, BoxType)>,
    {
        let mut fee = 0;
        for (size, box_type) in boxes {
            fee += self.box_fee(size, box_type, prefecture_code)?;
        }
        if self.is_free_for(subtotal) {
            return Ok(0);
        }
        Ok(fee)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    fn tier(price: i64) -> Vec<ShippingRate> {
        vec![
            ShippingRate {
                number: 1,
                name: "kanto".to_string(),
                price,
                prefecture_codes: vec![8, 9, 10, 11, 12, 13, 14],
            },
            ShippingRate {
                number: 2,
                name: "other".to_string(),
                price: price + 500,
                prefecture_codes: (1..=47).filter(|c| !(8..=14).contains(c)).collect(),
            },
        ]
    }

    /// Default shipping: 990/1100/1320 yen to Kanto, cold chain +220/330/440.
    pub fn shipping(coordinator: Option<&str>) -> Shipping {
        Shipping {
            id: ShippingId::new(coordinator.unwrap_or("default")).unwrap(),
            coordinator_id: coordinator.map(|c| CoordinatorId::new(c).unwrap()),
            box60_rates: tier(990),
            box60_cold: 220,
            box80_rates: tier(1100),
            box80_cold: 330,
            box100_rates: tier(1320),
            box100_cold: 440,
            has_free_shipping: false,
            free_shipping_threshold: 0,
        }
    }
}
