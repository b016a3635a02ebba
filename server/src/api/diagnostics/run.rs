use crate::api::ErrorResponse;
use crate::auth::AuthSession;
use crate::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use family_table_core::diagnostics::{run_check, DiagnosticCheck, DiagnosticResult};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Which sample document to create
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    Recipe,
    Story,
    Meal,
}

impl From<Check> for DiagnosticCheck {
    fn from(check: Check) -> Self {
        match check {
            Check::Recipe => DiagnosticCheck::Recipe,
            Check::Story => DiagnosticCheck::Story,
            Check::Meal => DiagnosticCheck::Meal,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DiagnosticResponse {
    pub success: bool,
    /// The created document
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
}

impl From<DiagnosticResult> for DiagnosticResponse {
    fn from(result: DiagnosticResult) -> Self {
        Self {
            success: result.success,
            data: result.data,
            error: result.error,
        }
    }
}

/// Failures are reported in the body with `success: false`, not as an error status.
#[utoipa::path(
    post,
    path = "/api/diagnostics/{check}",
    tag = "diagnostics",
    params(
        ("check" = Check, Path, description = "recipe, story or meal")
    ),
    responses(
        (status = 200, description = "Outcome of the check", body = DiagnosticResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn run_diagnostic(
    AuthSession(session): AuthSession,
    State(ctx): State<AppState>,
    Path(check): Path<Check>,
) -> impl IntoResponse {
    let result = run_check(&ctx, &session, check.into()).await;
    if !result.success {
        tracing::warn!(?check, error = ?result.error, "diagnostic check failed");
    }
    Json(DiagnosticResponse::from(result))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{send, test_app, ALICE};
    use axum::http::{Method, StatusCode};
    use family_table_core::diagnostics::NO_RECIPES_MESSAGE;

    #[tokio::test]
    async fn test_story_check_needs_a_recipe() {
        let app = test_app();
        let (status, body) =
            send(&app, Method::POST, "/api/diagnostics/story", Some(ALICE), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], NO_RECIPES_MESSAGE);

        let (_, body) =
            send(&app, Method::POST, "/api/diagnostics/recipe", Some(ALICE), None).await;
        assert_eq!(body["success"], true);
        assert!(body["data"]["title"]
            .as_str()
            .unwrap()
            .starts_with("Test Recipe"));

        let (_, body) =
            send(&app, Method::POST, "/api/diagnostics/story", Some(ALICE), None).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["text"], "This is a test story");
    }

    #[tokio::test]
    async fn test_unknown_check_rejected() {
        let app = test_app();
        let (status, _) =
            send(&app, Method::POST, "/api/diagnostics/bogus", Some(ALICE), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
