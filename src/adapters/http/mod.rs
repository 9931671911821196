//! HTTP adapter - REST API for carts, checkout and payment webhooks.
//!
//! - `GET /api/cart` - Current cart of the session
//! - `POST /api/cart/items` - Add an item
//! - `DELETE /api/cart/items/:product_id` - Remove an item
//! - `POST /api/checkout` - Check out and start payment
//! - `POST /api/webhooks/payments` - Payment gateway callbacks
//! - `GET /health` - Liveness probe

pub mod dto;
mod error;
mod extractors;
mod handlers;
mod routes;

pub use error::ApiError;
pub use extractors::{AuthenticatedUser, CartSession, SESSION_HEADER, USER_HEADER};
pub use handlers::AppState;
pub use routes::{api_routes, app_router};
