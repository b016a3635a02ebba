use crate::api::ErrorResponse;
use axum::{response::IntoResponse, Json};
use family_table_core::categories::{category_label, COMMON_CATEGORIES, FILTER_CATEGORIES};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoriesResponse {
    /// Suggestions for the recipe editor
    pub common: Vec<CategoryOption>,
    /// Choices for the list filter, starting with "all"
    pub filter: Vec<CategoryOption>,
}

fn option(tag: &str) -> CategoryOption {
    CategoryOption {
        value: tag.to_string(),
        label: category_label(tag),
    }
}

#[utoipa::path(
    get,
    path = "/api/recipes/categories",
    tag = "recipes",
    responses(
        (status = 200, description = "Category vocabularies", body = CategoriesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_categories() -> impl IntoResponse {
    let mut filter = vec![CategoryOption {
        value: "all".to_string(),
        label: "All Categories".to_string(),
    }];
    filter.extend(FILTER_CATEGORIES.iter().map(|t| option(t)));

    Json(CategoriesResponse {
        common: COMMON_CATEGORIES.iter().map(|t| option(t)).collect(),
        filter,
    })
}
