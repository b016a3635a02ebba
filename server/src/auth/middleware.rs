use crate::api::{app_error_response, error_json};
use crate::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use family_table_core::{AppError, BackendError};

use super::bearer_token;

/// Middleware that requires a valid bearer token for all requests.
/// The resolved session is stored in the request extensions for `AuthSession`.
pub async fn require_auth(
    State(ctx): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = match bearer_token(request.headers()) {
        Ok(t) => t.to_string(),
        Err(e) => return error_json(StatusCode::UNAUTHORIZED, e.message()),
    };

    let session = match ctx.authenticate(&token).await {
        Ok(s) => s,
        Err(AppError::Backend(BackendError::Unauthenticated)) => {
            return error_json(StatusCode::UNAUTHORIZED, "Invalid or expired token")
        }
        Err(e) => return app_error_response(e),
    };

    request.extensions_mut().insert(session);
    next.run(request).await
}
