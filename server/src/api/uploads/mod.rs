pub mod upload;

use crate::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use family_table_core::context::MAX_UPLOAD_BYTES;
use utoipa::OpenApi;

/// Room for the multipart framing around a maximum-size file.
const BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 64 * 1024;

/// Returns the router for /api/uploads endpoints (mounted at /api/uploads)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(upload::upload))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
}

#[derive(OpenApi)]
#[openapi(
    paths(upload::upload),
    components(schemas(upload::UploadRequest, upload::UploadResponse))
)]
pub struct ApiDoc;
