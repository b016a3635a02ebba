use crate::api::{app_error_response, error_json, ErrorResponse};
use crate::auth::AuthSession;
use crate::types::RecipeResponse;
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use family_table_core::categories::normalize_tag;
use family_table_core::filter::{self, Ownership, RecipeFilters};
use family_table_core::types::MAX_DIFFICULTY;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Whose recipes to list
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Show {
    /// Everyone's recipes
    #[default]
    All,
    /// Only the caller's recipes
    Mine,
    /// Only other people's recipes
    Others,
}

impl From<Show> for Ownership {
    fn from(show: Show) -> Self {
        match show {
            Show::All => Ownership::All,
            Show::Mine => Ownership::Mine,
            Show::Others => Ownership::Others,
        }
    }
}

/// Sort order for the recipe list
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Newest first
    #[default]
    Recent,
    /// Easiest first
    Difficulty,
    /// Quickest first
    Time,
}

impl From<SortBy> for filter::SortBy {
    fn from(sort_by: SortBy) -> Self {
        match sort_by {
            SortBy::Recent => filter::SortBy::Recent,
            SortBy::Difficulty => filter::SortBy::Difficulty,
            SortBy::Time => filter::SortBy::Time,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListRecipesParams {
    /// Number of items to return (default: 50, max: 1000)
    pub limit: Option<usize>,
    /// Number of items to skip (default: 0)
    pub offset: Option<usize>,
    /// Ownership filter (default: all)
    #[serde(default)]
    pub show: Show,
    /// Category tag, or "all" (default)
    pub category: Option<String>,
    /// Difficulty 1-5, or "all" (default)
    pub difficulty: Option<String>,
    /// Sort order (default: recent)
    #[serde(default)]
    pub sort_by: SortBy,
}

fn is_all(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case("all")
}

fn parse_filters(params: &ListRecipesParams) -> Result<RecipeFilters, String> {
    let category = params
        .category
        .as_deref()
        .filter(|c| !is_all(c))
        .map(normalize_tag);

    let difficulty = match params.difficulty.as_deref().filter(|d| !is_all(d)) {
        None => None,
        Some(raw) => match raw.trim().parse::<u8>() {
            Ok(d) if (1..=MAX_DIFFICULTY).contains(&d) => Some(d),
            _ => return Err(format!("Invalid difficulty: {}", raw)),
        },
    };

    Ok(RecipeFilters {
        show: params.show.into(),
        category,
        difficulty,
        sort_by: params.sort_by.into(),
    })
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMetadata {
    /// Number of recipes matching the filters
    pub total: usize,
    /// Number of items requested (limit)
    pub limit: usize,
    /// Number of items skipped (offset)
    pub offset: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeCounts {
    /// All recipes, before filtering
    pub total: usize,
    /// Recipes the caller created
    pub mine: usize,
    /// Recipes created by others
    pub community: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeResponse>,
    pub counts: RecipeCounts,
    pub pagination: PaginationMetadata,
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Filtered, sorted recipes", body = ListRecipesResponse),
        (status = 400, description = "Invalid parameters", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_recipes(
    AuthSession(session): AuthSession,
    State(ctx): State<AppState>,
    Query(params): Query<ListRecipesParams>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(50).clamp(1, 1000);
    let offset = params.offset.unwrap_or(0);

    let filters = match parse_filters(&params) {
        Ok(f) => f,
        Err(e) => return error_json(StatusCode::BAD_REQUEST, e),
    };

    let dashboard = match ctx.dashboard(&session, &filters).await {
        Ok(d) => d,
        Err(e) => return app_error_response(e),
    };

    let total = dashboard.recipes.len();
    let recipes = dashboard
        .recipes
        .into_iter()
        .skip(offset)
        .take(limit)
        .map(RecipeResponse::from)
        .collect();

    Json(ListRecipesResponse {
        recipes,
        counts: RecipeCounts {
            total: dashboard.counts.total,
            mine: dashboard.counts.mine,
            community: dashboard.counts.community,
        },
        pagination: PaginationMetadata {
            total,
            limit,
            offset,
        },
    })
    .into_response()
}
