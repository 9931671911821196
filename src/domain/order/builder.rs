//! Order construction: stock verification, pricing and snapshots.

use std::collections::HashMap;
use thiserror::Error;

use super::aggregate::{FulfillmentStatus, Order, OrderFulfillment, OrderItem};
use super::payment::{OrderPayment, PaymentMethodType, PaymentStatus};
use crate::domain::cart::Basket;
use crate::domain::catalog::{Product, Promotion, Shipping, ShippingError};
use crate::domain::customer::Address;
use crate::domain::foundation::{
    CoordinatorId, FulfillmentId, OrderId, ProductId, ServiceError, SessionId, Timestamp, UserId,
};

/// Consumption tax rate, in percent. Prices are tax exclusive.
pub const TAX_RATE_PERCENT: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("product is not on sale: {0}")]
    ProductUnpublished(ProductId),

    #[error("insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    #[error(transparent)]
    Shipping(#[from] ShippingError),
}

impl From<OrderError> for ServiceError {
    fn from(err: OrderError) -> Self {
        ServiceError::FailedPrecondition(err.to_string())
    }
}

/// Checks that every product in `baskets` exists, is on sale and has stock
/// for the combined quantity across the baskets.
pub fn verify_stock(
    baskets: &[&Basket],
    products: &HashMap<ProductId, Product>,
) -> Result<(), OrderError> {
    let mut requested: Vec<(&ProductId, i64)> = Vec::new();
    for item in baskets.iter().flat_map(|b| b.items.iter()) {
        match requested.iter_mut().find(|(id, _)| *id == &item.product_id) {
            Some((_, qty)) => *qty = qty.saturating_add(item.quantity),
            None => requested.push((&item.product_id, item.quantity)),
        }
    }

    for (product_id, quantity) in requested {
        let product = products
            .get(product_id)
            .ok_or_else(|| OrderError::ProductNotFound(product_id.clone()))?;
        if !product.is_published() {
            return Err(OrderError::ProductUnpublished(product_id.clone()));
        }
        if !product.has_stock_for(quantity) {
            return Err(OrderError::InsufficientStock {
                product_id: product_id.clone(),
                requested: quantity,
                available: product.inventory,
            });
        }
    }
    Ok(())
}

/// Price breakdown of an order, in yen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pricing {
    pub subtotal: i64,
    pub discount: i64,
    pub shipping_fee: i64,
    pub tax: i64,
    pub total: i64,
}

impl Pricing {
    pub fn calculate(subtotal: i64, shipping_fee: i64, promotion: Option<&Promotion>) -> Self {
        let discount = promotion
            .map(|p| p.calc_discount(subtotal, shipping_fee))
            .unwrap_or(0);
        let taxable = subtotal - discount + shipping_fee;
        let tax = taxable * TAX_RATE_PERCENT / 100;
        Self {
            subtotal,
            discount,
            shipping_fee,
            tax,
            total: taxable + tax,
        }
    }
}

/// Everything needed to build an order. Lookups happen beforehand.
pub struct OrderParams<'a> {
    pub order_id: OrderId,
    pub session_id: SessionId,
    pub user_id: UserId,
    pub coordinator_id: CoordinatorId,
    pub baskets: &'a [&'a Basket],
    pub products: &'a HashMap<ProductId, Product>,
    pub shipping: &'a Shipping,
    pub promotion: Option<&'a Promotion>,
    pub billing_address: &'a Address,
    pub shipping_address: &'a Address,
    pub method: PaymentMethodType,
    pub now: Timestamp,
}

/// Builds a pending order with one fulfillment per basket.
///
/// `transaction_id` is left empty until the payment session exists.
pub fn build_order(params: OrderParams<'_>) -> Result<Order, OrderError> {
    let mut fulfillments = Vec::with_capacity(params.baskets.len());
    let mut items = Vec::new();

    for basket in params.baskets {
        let fulfillment = OrderFulfillment {
            id: FulfillmentId::new(),
            box_number: basket.box_number,
            box_type: basket.box_type,
            box_size: basket.box_size,
            box_rate: basket.box_rate,
            shipping_address: params.shipping_address.clone(),
            status: FulfillmentStatus::Unfulfilled,
        };
        for item in &basket.items {
            let product = params
                .products
                .get(&item.product_id)
                .ok_or_else(|| OrderError::ProductNotFound(item.product_id.clone()))?;
            items.push(OrderItem {
                fulfillment_id: fulfillment.id,
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                price: product.price,
                quantity: item.quantity,
            });
        }
        fulfillments.push(fulfillment);
    }

    let subtotal: i64 = items.iter().map(OrderItem::amount).sum();
    let shipping_fee = params.shipping.calc_fee(
        params.baskets.iter().map(|b| (b.box_size, b.box_type)),
        subtotal,
        params.shipping_address.prefecture_code,
    )?;
    let pricing = Pricing::calculate(subtotal, shipping_fee, params.promotion);

    Ok(Order {
        id: params.order_id,
        session_id: params.session_id,
        user_id: params.user_id,
        coordinator_id: params.coordinator_id,
        promotion_id: params.promotion.map(|p| p.id.clone()),
        payment: OrderPayment {
            transaction_id: String::new(),
            payment_id: None,
            method: params.method,
            status: PaymentStatus::Pending,
            subtotal: pricing.subtotal,
            discount: pricing.discount,
            shipping_fee: pricing.shipping_fee,
            tax: pricing.tax,
            total: pricing.total,
            billing_address: params.billing_address.clone(),
            shipping_address: params.shipping_address.clone(),
            paid_at: None,
            captured_at: None,
            canceled_at: None,
            failed_at: None,
            refunded_at: None,
            refund_type: None,
            refund_total: 0,
            refund_reason: String::new(),
            last_event_at: None,
        },
        fulfillments,
        items,
        created_at: params.now,
        updated_at: params.now,
    })
}
