use axum::{
    Extension, Json,
    extract::{Request, State, rejection::JsonRejection},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::validation::json_body;
use super::{ApiError, AppState, LoginRequest, SignupRequest};
use crate::domain::Principal;
use crate::services::LoginResult;

// ============================================================================
// Middleware
// ============================================================================

/// Resolves `Authorization: Bearer <token>` to a [`Principal`] and stores it
/// in the request extensions for the handlers behind it.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).ok_or_else(ApiError::unauthenticated)?;

    let principal = state.auth_service().resolve_token(&token).await?;

    tracing::Span::current().record("user_id", principal.id.value());
    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_str = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = auth_str.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/signup
pub async fn signup(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<Principal>, ApiError> {
    let payload = json_body(payload)?;

    let principal = state
        .auth_service()
        .register(&payload.name, &payload.email, &payload.password)
        .await?;

    Ok(Json(principal))
}

/// POST /auth/login
/// Returns a bearer token valid for `security.access_token_expire_minutes`
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResult>, ApiError> {
    let payload = json_body(payload)?;

    let result = state
        .auth_service()
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(result))
}

/// GET /auth/me
pub async fn me(Extension(principal): Extension<Principal>) -> Json<Principal> {
    Json(principal)
}
