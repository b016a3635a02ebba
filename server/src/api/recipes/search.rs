use crate::api::{app_error_response, ErrorResponse};
use crate::auth::AuthSession;
use crate::types::RecipeResponse;
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use family_table_core::SearchBy;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Field to search in
#[derive(Debug, Default, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    #[default]
    Title,
    Ingredient,
    Category,
}

impl From<SearchField> for SearchBy {
    fn from(field: SearchField) -> Self {
        match field {
            SearchField::Title => SearchBy::Title,
            SearchField::Ingredient => SearchBy::Ingredient,
            SearchField::Category => SearchBy::Category,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Case-insensitive substring; blank returns every recipe
    #[serde(default)]
    pub q: String,
    /// Field to search (default: title)
    #[serde(default)]
    pub by: SearchField,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SearchResponse {
    pub recipes: Vec<RecipeResponse>,
}

#[utoipa::path(
    get,
    path = "/api/recipes/search",
    tag = "recipes",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching recipes, newest first", body = SearchResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn search_recipes(
    AuthSession(session): AuthSession,
    State(ctx): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    match ctx.search(&session, &params.q, params.by.into()).await {
        Ok(recipes) => Json(SearchResponse {
            recipes: recipes.into_iter().map(RecipeResponse::from).collect(),
        })
        .into_response(),
        Err(e) => app_error_response(e),
    }
}
