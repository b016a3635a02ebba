use crate::api::{app_error_response, ErrorResponse};
use crate::auth::AuthSession;
use crate::types::MealResponse;
use crate::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddRecipeRequest {
    pub recipe_id: String,
}

#[utoipa::path(
    post,
    path = "/api/meals/{id}/recipes",
    tag = "meals",
    params(
        ("id" = String, Path, description = "Meal ID")
    ),
    request_body = AddRecipeRequest,
    responses(
        (status = 200, description = "Recipe added (no change if already present)", body = MealResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Meal or recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_recipe(
    AuthSession(session): AuthSession,
    State(ctx): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AddRecipeRequest>,
) -> impl IntoResponse {
    match ctx.add_recipe_to_meal(&session, &id, &request.recipe_id).await {
        Ok(meal) => Json(MealResponse::from(meal)).into_response(),
        Err(e) => app_error_response(e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/meals/{id}/recipes/{recipe_id}",
    tag = "meals",
    params(
        ("id" = String, Path, description = "Meal ID"),
        ("recipe_id" = String, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe removed", body = MealResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Meal not found, or not the caller's", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove_recipe(
    AuthSession(session): AuthSession,
    State(ctx): State<AppState>,
    Path((id, recipe_id)): Path<(String, String)>,
) -> impl IntoResponse {
    match ctx.remove_recipe_from_meal(&session, &id, &recipe_id).await {
        Ok(meal) => Json(MealResponse::from(meal)).into_response(),
        Err(e) => app_error_response(e),
    }
}
