use crate::api::{app_error_response, error_json, ErrorResponse};
use crate::auth::AuthSession;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use family_table_core::{CookingInput, CookingKey};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CookingParams {
    /// Zero-based step index (default: 0, clamped to the last step)
    pub step: Option<usize>,
    /// Comma-separated indices of completed steps, e.g. "0,2"
    pub completed: Option<String>,
    /// Flip the current step's completed mark before applying `key`
    pub toggle: Option<bool>,
    /// Key pressed on the current step
    #[param(value_type = Option<String>, example = "arrow_right")]
    pub key: Option<CookingKey>,
}

fn parse_completed(raw: Option<&str>) -> Result<Vec<usize>, String> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| format!("Invalid completed step: {}", s))
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CookingResponse {
    pub recipe_id: String,
    pub title: String,
    pub step_index: usize,
    pub total_steps: usize,
    pub step: Option<String>,
    pub progress_percent: f64,
    pub is_first: bool,
    /// Show "Finish" instead of "Next"
    pub is_last: bool,
    pub completed: Vec<usize>,
    /// Up to six ingredient names, on the first step only
    pub ingredients_preview: Vec<String>,
    /// The key asked to leave cooking mode
    pub exit: bool,
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/cooking",
    tag = "recipes",
    params(
        ("id" = String, Path, description = "Recipe ID"),
        CookingParams
    ),
    responses(
        (status = 200, description = "Cooking mode state for one step", body = CookingResponse),
        (status = 400, description = "Invalid parameters", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn cooking(
    AuthSession(session): AuthSession,
    State(ctx): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<CookingParams>,
) -> impl IntoResponse {
    let completed = match parse_completed(params.completed.as_deref()) {
        Ok(c) => c,
        Err(e) => return error_json(StatusCode::BAD_REQUEST, e),
    };

    let input = CookingInput {
        step: params.step.unwrap_or(0),
        completed,
        toggle: params.toggle.unwrap_or(false),
        key: params.key,
    };

    match ctx.cooking(&session, &id, &input).await {
        Ok(view) => Json(CookingResponse {
            recipe_id: view.recipe_id,
            title: view.title,
            step_index: view.step_index,
            total_steps: view.total_steps,
            step: view.step,
            progress_percent: view.progress_percent,
            is_first: view.is_first,
            is_last: view.is_last,
            completed: view.completed,
            ingredients_preview: view.ingredients_preview,
            exit: view.exit,
        })
        .into_response(),
        Err(e) => app_error_response(e),
    }
}
