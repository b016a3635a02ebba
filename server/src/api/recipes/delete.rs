use crate::api::{app_error_response, ErrorResponse};
use crate::auth::AuthSession;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

/// Meals that list the recipe keep its id.
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = String, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the recipe's owner", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_recipe(
    AuthSession(session): AuthSession,
    State(ctx): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match ctx.delete_recipe(&session, &id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => app_error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{send, test_app, ALICE, BOB};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_owner_only_edit_and_delete() {
        let app = test_app();
        let (_, created) = send(
            &app,
            Method::POST,
            "/api/recipes",
            Some(ALICE),
            Some(json!({"title": "Pie", "full_instructions": "Bake"})),
        )
        .await;
        let uri = format!("/api/recipes/{}", created["id"].as_str().unwrap());

        let (status, _) = send(
            &app,
            Method::PUT,
            &uri,
            Some(BOB),
            Some(json!({"title": "Bob's Pie", "full_instructions": "Bake"})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(&app, Method::DELETE, &uri, Some(BOB), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(
            &app,
            Method::PUT,
            &uri,
            Some(ALICE),
            Some(json!({"title": "Apple Pie", "full_instructions": "Bake", "difficulty_level": 2})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Apple Pie");

        let (status, body) = send(&app, Method::GET, &uri, Some(BOB), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_owner"], false);
        assert_eq!(body["difficulty_stars"], json!([true, true, false, false, false]));

        let (status, _) = send(&app, Method::DELETE, &uri, Some(ALICE), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, Method::GET, &uri, Some(ALICE), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
