pub mod login_url;
pub mod unauthed_ping;
pub mod units;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for public endpoints (no auth required)
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/test/unauthed-ping",
            get(unauthed_ping::unauthed_ping),
        )
        .route("/api/auth/login-url", get(login_url::login_url))
        .route("/api/units", get(units::list_units))
        .route("/api/units/convert", get(units::convert))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        unauthed_ping::unauthed_ping,
        login_url::login_url,
        units::list_units,
        units::convert,
    ),
    components(schemas(
        unauthed_ping::UnauthedPingResponse,
        login_url::LoginUrlResponse,
        units::UnitInfo,
        units::CommonConversion,
        units::UnitsResponse,
        units::ConvertResponse,
    ))
)]
pub struct ApiDoc;
