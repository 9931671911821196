//! HTTP handlers for the storefront endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use super::dto::{
    AddCartItemRequest, CartResponse, CheckoutRequest, CheckoutResponse, RemoveCartItemQuery,
};
use super::error::ApiError;
use super::extractors::{AuthenticatedUser, CartSession};
use crate::adapters::komoju::SIGNATURE_HEADER;
use crate::application::handlers::cart::{
    AddCartItemCommand, AddCartItemHandler, CartStore, GetCartHandler, GetCartQuery,
    RemoveCartItemCommand, RemoveCartItemHandler,
};
use crate::application::handlers::checkout::CheckoutHandler;
use crate::application::handlers::payment::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
};
use crate::domain::foundation::ProductId;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state, cloned for each request.
#[derive(Clone)]
pub struct AppState {
    pub get_cart: Arc<GetCartHandler>,
    pub add_cart_item: Arc<AddCartItemHandler>,
    pub remove_cart_item: Arc<RemoveCartItemHandler>,
    pub checkout: Arc<CheckoutHandler>,
    pub payment_webhook: Arc<HandlePaymentWebhookHandler>,
}

impl AppState {
    pub fn new(
        carts: Arc<CartStore>,
        checkout: CheckoutHandler,
        payment_webhook: HandlePaymentWebhookHandler,
    ) -> Self {
        Self {
            get_cart: Arc::new(GetCartHandler::new(carts.clone())),
            add_cart_item: Arc::new(AddCartItemHandler::new(carts.clone())),
            remove_cart_item: Arc::new(RemoveCartItemHandler::new(carts)),
            checkout: Arc::new(checkout),
            payment_webhook: Arc::new(payment_webhook),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Cart
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/cart - Current cart of the session
pub async fn get_cart(
    State(state): State<AppState>,
    session: CartSession,
) -> Result<impl IntoResponse, ApiError> {
    let query = GetCartQuery {
        session_id: session.session_id,
    };
    let result = state.get_cart.handle(query).await?;
    Ok(Json(CartResponse::from(result.cart)))
}

/// POST /api/cart/items - Add an item to the session's cart
pub async fn add_cart_item(
    State(state): State<AppState>,
    session: CartSession,
    Json(request): Json<AddCartItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = AddCartItemCommand {
        session_id: session.session_id,
        product_id: ProductId::new(request.product_id)?,
        quantity: request.quantity,
    };
    state.add_cart_item.handle(cmd).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/cart/items/:product_id?box_number=N - Remove an item from a basket
pub async fn remove_cart_item(
    State(state): State<AppState>,
    session: CartSession,
    Path(product_id): Path<String>,
    Query(query): Query<RemoveCartItemQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = RemoveCartItemCommand {
        session_id: session.session_id,
        product_id: ProductId::new(product_id)?,
        box_number: query.box_number,
    };
    state.remove_cart_item.handle(cmd).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ════════════════════════════════════════════════════════════════════════════════
// Checkout
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/checkout - Buy a coordinator's baskets and start payment
pub async fn checkout(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    session: CartSession,
    Json(request): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = request.into_command(user.user_id, session.session_id)?;
    let result = state.checkout.handle(cmd).await?;

    tracing::info!(order_id = %result.order_id, "checkout started");

    Ok(Json(CheckoutResponse {
        url: result.redirect_url,
    }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Webhooks
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/webhooks/payments - Payment gateway callbacks
///
/// Accepted events answer 204 whether or not they changed an order, so the
/// gateway stops retrying replays.
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    // A missing header fails verification like a wrong one.
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let cmd = HandlePaymentWebhookCommand {
        payload: body.to_vec(),
        signature: signature.to_string(),
    };

    match state.payment_webhook.handle(cmd).await? {
        HandlePaymentWebhookResult::Applied { order_id } => {
            tracing::debug!(order_id = %order_id, "payment webhook applied");
        }
        HandlePaymentWebhookResult::Acknowledged => {}
    }

    Ok(StatusCode::NO_CONTENT)
}

// ════════════════════════════════════════════════════════════════════════════════
// Health
// ════════════════════════════════════════════════════════════════════════════════

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
