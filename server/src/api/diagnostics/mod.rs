pub mod run;

use crate::AppState;
use axum::routing::post;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/diagnostics endpoints (mounted at /api/diagnostics)
pub fn router() -> Router<AppState> {
    Router::new().route("/{check}", post(run::run_diagnostic))
}

#[derive(OpenApi)]
#[openapi(
    paths(run::run_diagnostic),
    components(schemas(run::Check, run::DiagnosticResponse))
)]
pub struct ApiDoc;
