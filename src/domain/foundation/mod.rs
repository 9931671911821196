//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, the timestamp value object, error types and the
//! state machine trait that the cart and order modules build on.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ServiceError, ValidationError};
pub use ids::{
    AddressId, CoordinatorId, FulfillmentId, OrderId, ProductId, PromotionId, SessionId,
    ShippingId, UserId,
};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
