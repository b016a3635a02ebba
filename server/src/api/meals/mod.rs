pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod recipes;

use crate::AppState;
use axum::routing::{delete, get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/meals endpoints (mounted at /api/meals)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_meals).post(create::create_meal))
        .route("/{id}", get(get::get_meal).delete(delete::delete_meal))
        .route("/{id}/recipes", post(recipes::add_recipe))
        .route(
            "/{id}/recipes/{recipe_id}",
            delete(recipes::remove_recipe),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_meals,
        create::create_meal,
        get::get_meal,
        delete::delete_meal,
        recipes::add_recipe,
        recipes::remove_recipe,
    ),
    components(schemas(
        list::MealCard,
        list::MealListResponse,
        crate::types::MealContent,
        get::MealDetailResponse,
        recipes::AddRecipeRequest,
    ))
)]
pub struct ApiDoc;
