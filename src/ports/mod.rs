//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the checkout core and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `CartCache` - TTL-bound cart storage keyed by session
//! - `OrderRepository` - Order insert and conditional payment updates
//!
//! ## Lookup Ports
//!
//! - `UserService` - Customer profiles and addresses
//! - `ProductRepository`, `ShippingRepository`, `PromotionRepository` - Catalog snapshots
//!
//! ## Integration Ports
//!
//! - `PaymentGateway` - Payment sessions, pay calls and webhook verification
//! - `Notifier` - Order notification trigger
//!
//! ## Runtime Ports
//!
//! - `Clock` - Injected current time
//! - `BackgroundExecutor` - Detached, shutdown-tracked tasks

mod background_executor;
mod cart_cache;
mod clock;
mod notifier;
mod order_repository;
mod payment_gateway;
mod product_repository;
mod promotion_repository;
mod shipping_repository;
mod user_service;

pub use background_executor::BackgroundExecutor;
pub use cart_cache::{CacheError, CartCache};
pub use clock::Clock;
pub use notifier::Notifier;
pub use order_repository::OrderRepository;
pub use payment_gateway::{
    CreateSessionRequest, CreditCardDetail, LineItem, PayResult, PaymentError, PaymentErrorCode,
    PaymentGateway, PaymentSession, WebhookEvent, WebhookEventType, WebhookPayment, WebhookRefund,
};
pub use product_repository::ProductRepository;
pub use promotion_repository::PromotionRepository;
pub use shipping_repository::ShippingRepository;
pub use user_service::UserService;
