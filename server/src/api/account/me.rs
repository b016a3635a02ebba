use crate::api::ErrorResponse;
use crate::auth::AuthSession;
use crate::types::UserResponse;
use axum::{response::IntoResponse, Json};

#[utoipa::path(
    get,
    path = "/api/me",
    tag = "auth",
    responses(
        (status = 200, description = "The signed-in user", body = UserResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(AuthSession(session): AuthSession) -> impl IntoResponse {
    Json(UserResponse::from(session.user))
}
