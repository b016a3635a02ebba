use crate::api::{app_error_response, ErrorResponse};
use crate::auth::AuthSession;
use crate::types::{MealResponse, RecipeResponse};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct MealDetailParams {
    /// Filters the recipes that can still be added, by title
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MealDetailResponse {
    pub meal: MealResponse,
    /// The meal's recipes in meal order; deleted recipes are skipped
    pub recipes: Vec<RecipeResponse>,
    /// Recipes not yet in the meal that match `q`
    pub available: Vec<RecipeResponse>,
    pub is_owner: bool,
}

#[utoipa::path(
    get,
    path = "/api/meals/{id}",
    tag = "meals",
    params(
        ("id" = String, Path, description = "Meal ID"),
        MealDetailParams
    ),
    responses(
        (status = 200, description = "Meal with its recipes", body = MealDetailResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Meal not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_meal(
    AuthSession(session): AuthSession,
    State(ctx): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<MealDetailParams>,
) -> impl IntoResponse {
    match ctx.meal_view(&session, &id, &params.q).await {
        Ok(view) => Json(MealDetailResponse {
            meal: view.meal.into(),
            recipes: view.recipes.into_iter().map(RecipeResponse::from).collect(),
            available: view.available.into_iter().map(RecipeResponse::from).collect(),
            is_owner: view.is_owner,
        })
        .into_response(),
        Err(e) => app_error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{send, test_app, ALICE, BOB};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_get_meal_lists_available_recipes() {
        let app = test_app();
        let mut ids = Vec::new();
        for title in ["Apple Pie", "Apple Crumble", "Pot Roast"] {
            let (_, body) = send(
                &app,
                Method::POST,
                "/api/recipes",
                Some(ALICE),
                Some(json!({"title": title, "full_instructions": "Bake"})),
            )
            .await;
            ids.push(body["id"].as_str().unwrap().to_string());
        }
        let (_, meal) = send(
            &app,
            Method::POST,
            "/api/meals",
            Some(ALICE),
            Some(json!({"name": "Harvest", "recipe_ids": [ids[0]]})),
        )
        .await;
        let uri = format!("/api/meals/{}?q=apple", meal["id"].as_str().unwrap());

        let (status, body) = send(&app, Method::GET, &uri, Some(ALICE), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_owner"], true);
        assert_eq!(body["recipes"][0]["title"], "Apple Pie");
        let available = body["available"].as_array().unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0]["title"], "Apple Crumble");

        // Meals are private to their creator
        let (status, _) = send(&app, Method::GET, &uri, Some(BOB), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
