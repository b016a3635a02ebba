use crate::api::{app_error_response, ErrorResponse};
use crate::auth::AuthSession;
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses(
        (status = 204, description = "Session ended"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn logout(
    AuthSession(session): AuthSession,
    State(ctx): State<AppState>,
) -> impl IntoResponse {
    match ctx.logout(&session).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => app_error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{send, test_app, ALICE, BOB};
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn test_me_then_logout() {
        let app = test_app();
        let (status, body) = send(&app, Method::GET, "/api/me", Some(BOB), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["display_name"], "bob@example.com");

        let (status, _) = send(&app, Method::POST, "/api/auth/logout", Some(ALICE), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, Method::GET, "/api/me", Some(ALICE), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
