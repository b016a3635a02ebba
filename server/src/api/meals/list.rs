use crate::api::{app_error_response, ErrorResponse};
use crate::auth::AuthSession;
use crate::types::MealResponse;
use crate::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use family_table_core::MealSummary;
use serde::Serialize;
use utoipa::ToSchema;

/// A meal as shown on the "My Meals" grid
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MealCard {
    pub meal: MealResponse,
    /// Number of the meal's recipes that still exist
    pub recipe_count: usize,
    /// Up to three recipe titles
    pub preview_titles: Vec<String>,
    /// Recipes beyond the preview ("+N more")
    pub more_count: usize,
}

impl From<MealSummary> for MealCard {
    fn from(summary: MealSummary) -> Self {
        let (titles, more_count) = summary.preview_titles();
        let preview_titles = titles.into_iter().map(str::to_string).collect();
        Self {
            recipe_count: summary.recipes.len(),
            preview_titles,
            more_count,
            meal: summary.meal.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MealListResponse {
    pub meals: Vec<MealCard>,
}

#[utoipa::path(
    get,
    path = "/api/meals",
    tag = "meals",
    responses(
        (status = 200, description = "The caller's meals", body = MealListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_meals(
    AuthSession(session): AuthSession,
    State(ctx): State<AppState>,
) -> impl IntoResponse {
    match ctx.my_meals(&session).await {
        Ok(meals) => Json(MealListResponse {
            meals: meals.into_iter().map(MealCard::from).collect(),
        })
        .into_response(),
        Err(e) => app_error_response(e),
    }
}
