/// Bearer token authentication
///
/// Applied with `route_layer` to the routes that need a signed-in user.
/// On success the resolved [`Session`] is inserted into the request
/// extensions, where handlers pick it up with `Extension<Session>`.
///
/// [`Session`]: postboard_shared::services::Session

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::{
    app::AppState,
    error::{ApiError, ServiceResultExt},
};

/// Rejects the request with 401 unless it carries a live bearer token
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers())
        .ok_or_else(ApiError::unauthenticated)?
        .to_string();

    let session = state
        .auth
        .current_user(&token)
        .await
        .or_fail("Failed to authenticate request")?;

    tracing::debug!(user_id = session.user.id, "Request authenticated");

    req.extensions_mut().insert(session);

    Ok(next.run(req).await)
}

/// Token from an `Authorization: Bearer <token>` header, if any
///
/// The scheme name is matched case-insensitively.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }
    let token = token.trim();

    (!token.is_empty()).then_some(token)
}
