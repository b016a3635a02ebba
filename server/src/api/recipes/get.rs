use crate::api::{app_error_response, ErrorResponse};
use crate::auth::AuthSession;
use crate::types::{RecipeResponse, StoryResponse};
use crate::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeDetailResponse {
    pub recipe: RecipeResponse,
    /// Instructions split into steps, numbering removed
    pub steps: Vec<String>,
    /// Newest first
    pub stories: Vec<StoryResponse>,
    pub is_owner: bool,
    /// Five slots, the first `difficulty_level` filled
    pub difficulty_stars: Vec<bool>,
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = String, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe details", body = RecipeDetailResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_recipe(
    AuthSession(session): AuthSession,
    State(ctx): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let view = match ctx.recipe_view(&session, &id).await {
        Ok(v) => v,
        Err(e) => return app_error_response(e),
    };

    Json(RecipeDetailResponse {
        difficulty_stars: view.recipe.data.difficulty_stars().to_vec(),
        steps: view.steps,
        stories: view.stories.into_iter().map(StoryResponse::from).collect(),
        is_owner: view.is_owner,
        recipe: view.recipe.into(),
    })
    .into_response()
}
