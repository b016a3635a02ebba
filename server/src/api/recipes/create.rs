use crate::api::{app_error_response, ErrorResponse};
use crate::auth::AuthSession;
use crate::types::{RecipeContent, RecipeResponse};
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = RecipeContent,
    responses(
        (status = 201, description = "Recipe created successfully", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthSession(session): AuthSession,
    State(ctx): State<AppState>,
    Json(request): Json<RecipeContent>,
) -> impl IntoResponse {
    match ctx.save_recipe(&session, None, request.into()).await {
        Ok(recipe) => (StatusCode::CREATED, Json(RecipeResponse::from(recipe))).into_response(),
        Err(e) => app_error_response(e),
    }
}
