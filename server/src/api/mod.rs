pub mod account;
pub mod diagnostics;
pub mod meals;
pub mod public;
pub mod recipes;
pub mod testing;
pub mod uploads;

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use family_table_core::{AppError, BackendError};
use serde::Serialize;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{OpenApi, ToSchema};

use crate::types::{
    Ingredient, MealResponse, RecipeContent, RecipeResponse, StoryResponse, UserResponse,
};

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn error_json(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

/// Map an application error to its HTTP status, passing backend text through verbatim.
pub fn app_error_response(err: AppError) -> Response {
    let status = match &err {
        AppError::Validation(_) | AppError::Conversion(_) => StatusCode::BAD_REQUEST,
        AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        AppError::Backend(BackendError::Unauthenticated) => StatusCode::UNAUTHORIZED,
        AppError::Backend(BackendError::NotFound { .. }) => StatusCode::NOT_FOUND,
        AppError::Backend(BackendError::Status { .. }) => StatusCode::BAD_GATEWAY,
        AppError::Backend(BackendError::Request(_) | BackendError::Decode(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    if status.is_server_error() {
        tracing::error!(error = %err, "backend call failed");
    }

    error_json(status, err.to_string())
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Family Table API"),
        components(schemas(
            ErrorResponse,
            Ingredient,
            RecipeContent,
            RecipeResponse,
            MealResponse,
            StoryResponse,
            UserResponse
        ))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    if let Some(components) = spec.components.as_mut() {
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }

    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        public::ApiDoc::openapi(),
        testing::ApiDoc::openapi(),
        account::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        meals::ApiDoc::openapi(),
        uploads::ApiDoc::openapi(),
        diagnostics::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use family_table_core::{ConversionError, ValidationError};

    #[test]
    fn test_error_statuses() {
        let cases = [
            (
                AppError::Validation(ValidationError::MissingField("title")),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Conversion(ConversionError::UnknownUnit("x".to_string())),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::Forbidden("recipe"), StatusCode::FORBIDDEN),
            (
                AppError::Backend(BackendError::Unauthenticated),
                StatusCode::UNAUTHORIZED,
            ),
            (
                AppError::Backend(BackendError::NotFound {
                    kind: "Meal",
                    id: "m".to_string(),
                }),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::Backend(BackendError::Status {
                    status: 500,
                    body: "boom".to_string(),
                }),
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(app_error_response(err).status(), status);
        }
    }

    #[test]
    fn test_openapi_has_every_module() {
        let spec = openapi();
        for path in [
            "/api/test/unauthed-ping",
            "/api/units/convert",
            "/api/me",
            "/api/recipes",
            "/api/recipes/{id}/cooking",
            "/api/meals/{id}/recipes/{recipe_id}",
            "/api/uploads",
            "/api/diagnostics/{check}",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
