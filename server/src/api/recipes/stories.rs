use crate::api::{app_error_response, ErrorResponse};
use crate::auth::AuthSession;
use crate::types::{StoryContent, StoryResponse};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoriesResponse {
    /// Newest first
    pub stories: Vec<StoryResponse>,
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/stories",
    tag = "stories",
    params(
        ("id" = String, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Stories told about the recipe", body = StoriesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_stories(
    AuthSession(session): AuthSession,
    State(ctx): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match ctx.stories(&session, &id).await {
        Ok(stories) => Json(StoriesResponse {
            stories: stories.iter().cloned().map(StoryResponse::from).collect(),
        })
        .into_response(),
        Err(e) => app_error_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/stories",
    tag = "stories",
    params(
        ("id" = String, Path, description = "Recipe ID")
    ),
    request_body = StoryContent,
    responses(
        (status = 201, description = "Story added", body = StoryResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_story(
    AuthSession(session): AuthSession,
    State(ctx): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<StoryContent>,
) -> impl IntoResponse {
    match ctx.add_story(&session, &id, request.into()).await {
        Ok(story) => (StatusCode::CREATED, Json(StoryResponse::from(story))).into_response(),
        Err(e) => app_error_response(e),
    }
}
