use crate::api::{app_error_response, ErrorResponse};
use crate::auth::AuthSession;
use crate::types::{MealContent, MealResponse};
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

#[utoipa::path(
    post,
    path = "/api/meals",
    tag = "meals",
    request_body = MealContent,
    responses(
        (status = 201, description = "Meal created", body = MealResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_meal(
    AuthSession(session): AuthSession,
    State(ctx): State<AppState>,
    Json(request): Json<MealContent>,
) -> impl IntoResponse {
    match ctx.create_meal(&session, request.into()).await {
        Ok(meal) => (StatusCode::CREATED, Json(MealResponse::from(meal))).into_response(),
        Err(e) => app_error_response(e),
    }
}
