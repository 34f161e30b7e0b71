use super::AppState;
use crate::utils::error::LibraryError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Rejects any request whose shared-secret header is absent or wrong before
/// it reaches a handler.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, LibraryError> {
    let authorized = request
        .headers()
        .get(state.auth.header_name.as_str())
        .and_then(|value| value.to_str().ok())
        .is_some_and(|key| key == state.auth.api_key);

    if authorized {
        return Ok(next.run(request).await);
    }

    tracing::warn!(
        "Rejected {} {}: missing or invalid {}",
        request.method(),
        request.uri().path(),
        state.auth.header_name
    );
    Err(LibraryError::Unauthorized)
}
