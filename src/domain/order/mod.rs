//! Order domain module.
//!
//! # Module Structure
//!
//! - `aggregate` - Order, fulfillments and items
//! - `payment` - OrderPayment and the PaymentStatus state machine
//! - `builder` - Stock verification, pricing and order construction

mod aggregate;
mod builder;
mod payment;

pub use aggregate::{FulfillmentStatus, Order, OrderFulfillment, OrderItem};
pub use builder::{build_order, verify_stock, OrderError, OrderParams, Pricing, TAX_RATE_PERCENT};
pub use payment::{
    OrderPayment, PaymentMethodType, PaymentStatus, PaymentStatusUpdate, RefundType, RefundUpdate,
};

#[cfg(test)]
pub(crate) mod fixtures {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::{build_order, Order, OrderParams, PaymentMethodType};
    use crate::domain::cart::{Cart, ALL_BOXES};
    use crate::domain::catalog::fixtures::{product, shipping};
    use crate::domain::customer::fixtures::address;
    use crate::domain::foundation::{CoordinatorId, OrderId, SessionId, Timestamp, UserId};

    /// Pending order for two units of p1 from coordinator c1, session s1.
    pub fn order() -> Order {
        let p1 = product("p1", "c1");
        let products = HashMap::from([(p1.id.clone(), p1.clone())]);
        let now = Timestamp::now();
        let mut cart = Cart::new(SessionId::new("s1").unwrap(), now, Duration::from_secs(60));
        cart.add_item(&p1, 2, &products).unwrap();
        let coordinator_id = CoordinatorId::new("c1").unwrap();
        let baskets = cart.baskets_for(&coordinator_id, ALL_BOXES);
        let shipping = shipping(None);
        let addr = address("a1", "u1");

        let mut order = build_order(OrderParams {
            order_id: OrderId::new(),
            session_id: cart.session_id.clone(),
            user_id: UserId::new("u1").unwrap(),
            coordinator_id: coordinator_id.clone(),
            baskets: &baskets,
            products: &products,
            shipping: &shipping,
            promotion: None,
            billing_address: &addr,
            shipping_address: &addr,
            method: PaymentMethodType::CreditCard,
            now,
        })
        .unwrap();
        order.payment.transaction_id = "sess_1".to_string();
        order
    }
}
