pub mod categories;
pub mod cooking;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod search;
pub mod stories;
pub mod update;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes).post(create::create_recipe))
        .route("/search", get(search::search_recipes))
        .route("/categories", get(categories::list_categories))
        .route(
            "/{id}",
            get(get::get_recipe)
                .put(update::update_recipe)
                .delete(delete::delete_recipe),
        )
        .route("/{id}/cooking", get(cooking::cooking))
        .route(
            "/{id}/stories",
            get(stories::list_stories).post(stories::create_story),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_recipes,
        create::create_recipe,
        search::search_recipes,
        categories::list_categories,
        get::get_recipe,
        update::update_recipe,
        delete::delete_recipe,
        cooking::cooking,
        stories::list_stories,
        stories::create_story,
    ),
    components(schemas(
        list::ListRecipesResponse,
        list::PaginationMetadata,
        list::RecipeCounts,
        list::Show,
        list::SortBy,
        search::SearchField,
        search::SearchResponse,
        categories::CategoryOption,
        categories::CategoriesResponse,
        get::RecipeDetailResponse,
        cooking::CookingResponse,
        stories::StoriesResponse,
    ))
)]
pub struct ApiDoc;
