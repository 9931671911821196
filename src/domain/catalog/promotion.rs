//! Promotion (discount code) snapshot.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PromotionId, Timestamp};

/// How a promotion reduces the order total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// Fixed yen amount, capped at the subtotal.
    Amount,
    /// Percentage of the subtotal.
    Rate,
    /// Waives the shipping fee.
    FreeShipping,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    pub id: PromotionId,
    pub title: String,
    pub code: String,
    pub public: bool,
    pub discount_type: DiscountType,
    /// Yen for `Amount`, percent for `Rate`, unused for `FreeShipping`.
    pub discount_rate: i64,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
}

impl Promotion {
    /// Returns true when the promotion is public and `now` lies in `[start_at, end_at]`.
    pub fn is_enabled(&self, now: Timestamp) -> bool {
        self.public && !now.is_before(&self.start_at) && !now.is_after(&self.end_at)
    }

    /// Computes the discount for a priced order.
    pub fn calc_discount(&self, subtotal: i64, shipping_fee: i64) -> i64 {
        match self.discount_type {
            DiscountType::Amount => self.discount_rate.clamp(0, subtotal.max(0)),
            DiscountType::Rate => {
                let rate = self.discount_rate.clamp(0, 100);
                subtotal.max(0) * rate / 100
            }
            DiscountType::FreeShipping => shipping_fee,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::promotion;
    use super::*;

    #[test]
    fn enabled_inside_window() {
        let now = Timestamp::now();
        assert!(promotion("pr1", now).is_enabled(now));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let now = Timestamp::now();
        let mut p = promotion("pr1", now);
        p.start_at = now;
        p.end_at = now;
        assert!(p.is_enabled(now));
    }

    #[test]
    fn disabled_when_private() {
        let now = Timestamp::now();
        let mut p = promotion("pr1", now);
        p.public = false;
        assert!(!p.is_enabled(now));
    }

    #[test]
    fn disabled_before_start_and_after_end() {
        let now = Timestamp::now();
        let mut p = promotion("pr1", now);
        p.start_at = now.plus_secs(1);
        assert!(!p.is_enabled(now));

        let mut p = promotion("pr1", now);
        p.end_at = now.plus_secs(-1);
        assert!(!p.is_enabled(now));
    }

    #[test]
    fn amount_discount_is_capped_at_subtotal() {
        let mut p = promotion("pr1", Timestamp::now());
        p.discount_type = DiscountType::Amount;
        p.discount_rate = 800;
        assert_eq!(p.calc_discount(1000, 500), 800);
        assert_eq!(p.calc_discount(300, 500), 300);
    }

    #[test]
    fn rate_discount_floors() {
        let p = promotion("pr1", Timestamp::now());
        assert_eq!(p.calc_discount(1005, 0), 100);
    }

    #[test]
    fn free_shipping_discount_equals_fee() {
        let mut p = promotion("pr1", Timestamp::now());
        p.discount_type = DiscountType::FreeShipping;
        assert_eq!(p.calc_discount(1000, 990), 990);
    }
}
