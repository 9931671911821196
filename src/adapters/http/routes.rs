//! Axum router configuration for the storefront API.

use http::HeaderValue;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{
    add_cart_item, checkout, get_cart, health, payment_webhook, remove_cart_item, AppState,
};
use crate::config::ServerConfig;

/// Create the API routes.
///
/// # Routes
///
/// ## Session Endpoints (require `X-Session-Id`)
/// - `GET /cart` - Current cart
/// - `POST /cart/items` - Add an item
/// - `DELETE /cart/items/:product_id?box_number=N` - Remove an item
///
/// ## Customer Endpoints (require `X-User-Id` and `X-Session-Id`)
/// - `POST /checkout` - Check out and start payment
///
/// ## Webhook Endpoints (no auth, signature verified)
/// - `POST /webhooks/payments` - Payment gateway callbacks
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(get_cart))
        .route("/cart/items", post(add_cart_item))
        .route("/cart/items/:product_id", delete(remove_cart_item))
        .route("/checkout", post(checkout))
        .route("/webhooks/payments", post(payment_webhook))
}

/// Build the complete application with middleware and state.
pub fn app_router(state: AppState, server: &ServerConfig) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .route("/health", get(health))
        .with_state(state)
        .layer(cors_layer(&server.cors_origins_list()))
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Permissive when no origins are configured.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
