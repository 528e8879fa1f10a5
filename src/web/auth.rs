//! Token-based authentication for the web API

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

/// Query parameters for token authentication
#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

/// Shared state for authentication
pub struct AuthState {
    pub token: String,
}

/// Generate a new random token
pub fn generate_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Extract Bearer token from Authorization header
fn extract_bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

/// Authentication middleware
///
/// Accepts `Authorization: Bearer <token>` first, then falls back to a
/// `?token=<token>` query parameter for EventSource clients that cannot
/// set headers.
pub async fn auth_middleware(
    State(auth): State<Arc<AuthState>>,
    Query(query): Query<TokenQuery>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let presented = extract_bearer_token(&request)
        .map(str::to_string)
        .or(query.token);

    match presented {
        Some(token) if token == auth.token => next.run(request).await,
        Some(_) => {
            tracing::warn!("API: rejected request with invalid token path={}", request.uri().path());
            unauthorized("Invalid token")
        }
        None => unauthorized("No token provided"),
    }
}
