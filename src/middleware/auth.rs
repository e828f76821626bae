use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::error::ApiError;

/// Caller identity injected by the upstream gateway
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
}

/// Trusts the identity header set by the gateway; no token validation happens here.
/// Missing or blank values are rejected with 401.
pub async fn user_header_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let user_id = request
        .headers()
        .get(state.user_header.as_str())
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    match user_id {
        Some(user_id) => {
            request.extensions_mut().insert(AuthUser { user_id });
            next.run(request).await
        }
        None => {
            tracing::debug!("Rejected request without '{}' header", state.user_header);
            ApiError::unauthorized("Authentication required").into_response()
        }
    }
}
