use crate::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct LoginUrlParams {
    /// Path to come back to after signing in (default: "/")
    pub return_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginUrlResponse {
    pub url: String,
}

#[utoipa::path(
    get,
    path = "/api/auth/login-url",
    tag = "auth",
    params(LoginUrlParams),
    responses(
        (status = 200, description = "Backend sign-in page", body = LoginUrlResponse)
    )
)]
pub async fn login_url(
    State(ctx): State<AppState>,
    Query(params): Query<LoginUrlParams>,
) -> impl IntoResponse {
    let return_path = params.return_path.as_deref().unwrap_or("/");
    Json(LoginUrlResponse {
        url: ctx.login_url(return_path),
    })
}
