//! Request context extractors.
//!
//! Identity comes from headers set by the upstream gateway: `X-Session-Id`
//! names the cart and `X-User-Id` the signed-in customer.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use super::dto::ErrorResponse;
use crate::domain::foundation::{SessionId, UserId};

pub const SESSION_HEADER: &str = "x-session-id";
pub const USER_HEADER: &str = "x-user-id";

fn header_value<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}

/// Cart session of the caller.
#[derive(Debug, Clone)]
pub struct CartSession {
    pub session_id: SessionId,
}

/// Rejection for a request without a usable session header.
pub struct SessionRequired;

impl IntoResponse for SessionRequired {
    fn into_response(self) -> Response {
        let error = ErrorResponse::new("SESSION_REQUIRED", "X-Session-Id header is required");
        (StatusCode::BAD_REQUEST, Json(error)).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CartSession
where
    S: Send + Sync,
{
    type Rejection = SessionRequired;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session_id = header_value(parts, SESSION_HEADER)
            .and_then(|s| SessionId::new(s).ok())
            .ok_or(SessionRequired)?;
        Ok(CartSession { session_id })
    }
}

/// Authenticated user context extracted from request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Rejection type for AuthenticatedUser extraction.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> Response {
        let error = ErrorResponse::new("AUTHENTICATION_REQUIRED", "Authentication is required");
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header_value(parts, USER_HEADER)
            .and_then(|s| UserId::new(s).ok())
            .ok_or(AuthenticationRequired)?;
        Ok(AuthenticatedUser { user_id })
    }
}
