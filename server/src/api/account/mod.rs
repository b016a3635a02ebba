pub mod logout;
pub mod me;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Signed-in user routes, at their full paths
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/me", get(me::me))
        .route("/api/auth/logout", post(logout::logout))
}

#[derive(OpenApi)]
#[openapi(paths(me::me, logout::logout))]
pub struct ApiDoc;
