use crate::api::{app_error_response, error_json, ErrorResponse};
use crate::auth::AuthSession;
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use family_table_core::context::MAX_UPLOAD_BYTES;
use family_table_core::UploadFile;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UploadResponse {
    /// URL to store in a recipe's media_urls or a story's media_url
    pub file_url: String,
}

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadRequest {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

const FILE_FIELD: &str = "file";

fn too_large() -> String {
    format!(
        "File too large. Maximum size is {}MB",
        MAX_UPLOAD_BYTES / (1024 * 1024)
    )
}

#[utoipa::path(
    post,
    path = "/api/uploads",
    tag = "uploads",
    request_body(content_type = "multipart/form-data", content = UploadRequest),
    responses(
        (status = 201, description = "File stored", body = UploadResponse),
        (status = 400, description = "Missing or oversized file", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload(
    AuthSession(session): AuthSession,
    State(ctx): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    // Other form fields are ignored; only "file" is stored.
    let field = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some(FILE_FIELD) => break field,
            Ok(Some(field)) => {
                tracing::debug!(name = ?field.name(), "Skipping multipart field");
            }
            Ok(None) => return error_json(StatusCode::BAD_REQUEST, "No file provided"),
            Err(e) => {
                tracing::warn!("Multipart read error: {}", e);
                let error_msg = if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    too_large()
                } else {
                    format!("Failed to read multipart data: {}", e.body_text())
                };
                return error_json(e.status(), error_msg);
            }
        }
    };

    let file_name = field.file_name().unwrap_or("upload").to_string();
    let content_type = field.content_type().map(str::to_string);

    let bytes = match field.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Field read error: {}", e);
            let error_msg = if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                too_large()
            } else {
                format!("Failed to read file data: {}", e.body_text())
            };
            return error_json(e.status(), error_msg);
        }
    };

    let file = UploadFile {
        file_name,
        content_type,
        bytes: bytes.to_vec(),
    };

    match ctx.upload(&session, file).await {
        Ok(uploaded) => (
            StatusCode::CREATED,
            Json(UploadResponse {
                file_url: uploaded.file_url,
            }),
        )
            .into_response(),
        Err(e) => app_error_response(e),
    }
}
