use crate::api::{app_error_response, ErrorResponse};
use crate::auth::AuthSession;
use crate::types::{RecipeContent, RecipeResponse};
use crate::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

/// Replaces every editable field; omitted fields take their defaults.
#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = String, Path, description = "Recipe ID")
    ),
    request_body = RecipeContent,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the recipe's owner", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_recipe(
    AuthSession(session): AuthSession,
    State(ctx): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RecipeContent>,
) -> impl IntoResponse {
    match ctx.save_recipe(&session, Some(&id), request.into()).await {
        Ok(recipe) => Json(RecipeResponse::from(recipe)).into_response(),
        Err(e) => app_error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{send, test_app, ALICE, BOB};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_only_owner_updates() {
        let app = test_app();
        let (_, created) = send(
            &app,
            Method::POST,
            "/api/recipes",
            Some(ALICE),
            Some(json!({"title": "Chili", "full_instructions": "Simmer", "servings": 8})),
        )
        .await;
        let uri = format!("/api/recipes/{}", created["id"].as_str().unwrap());
        let edit = json!({"title": "Five Alarm Chili", "full_instructions": "Simmer longer"});

        let (status, _) = send(&app, Method::PUT, &uri, Some(BOB), Some(edit.clone())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(&app, Method::PUT, &uri, Some(ALICE), Some(edit)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Five Alarm Chili");
        // Omitted numbers fall back to the editor defaults
        assert_eq!(body["servings"], 4);
        assert_eq!(body["id"], created["id"]);
    }
}
