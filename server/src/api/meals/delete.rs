use crate::api::{app_error_response, ErrorResponse};
use crate::auth::AuthSession;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

#[utoipa::path(
    delete,
    path = "/api/meals/{id}",
    tag = "meals",
    params(
        ("id" = String, Path, description = "Meal ID")
    ),
    responses(
        (status = 204, description = "Meal deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Meal not found, or not the caller's", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_meal(
    AuthSession(session): AuthSession,
    State(ctx): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match ctx.delete_meal(&session, &id).await {
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
    async fn test_delete_meal() {
        let app = test_app();
        let (_, meal) = send(
            &app,
            Method::POST,
            "/api/meals",
            Some(ALICE),
            Some(json!({"name": "Picnic"})),
        )
        .await;
        let uri = format!("/api/meals/{}", meal["id"].as_str().unwrap());

        let (status, _) = send(&app, Method::DELETE, &uri, Some(BOB), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::DELETE, &uri, Some(ALICE), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, Method::GET, &uri, Some(ALICE), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
