mod api;
mod auth;
mod telemetry;
mod types;

use axum::extract::MatchedPath;
use axum::http::Request;
use axum::middleware;
use axum::Router;
use family_table_core::backend::cache_ttl_from_env;
use family_table_core::cache::QueryCache;
use family_table_core::{AppContext, Backend, BackendConfig};
use std::env;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::Span;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across all handlers
pub type AppState = Arc<AppContext>;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Every route, with auth on everything outside the public router.
pub fn build_router(state: AppState) -> Router {
    let public_router = api::public::router();

    let protected_router = Router::new()
        .merge(api::account::router())
        .nest("/api/test", api::testing::router())
        .nest("/api/recipes", api::recipes::router())
        .nest("/api/meals", api::meals::router())
        .nest("/api/uploads", api::uploads::router())
        .nest("/api/diagnostics", api::diagnostics::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    Router::new()
        .merge(public_router)
        .merge(protected_router)
        .merge(swagger_ui)
        .with_state(state)
        .layer(middleware::from_fn(telemetry::call_count_header_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());

                    // Don't create a span at all for noisy endpoints
                    if matched_path == "/api/test/unauthed-ping" {
                        tracing::trace_span!("http_request")
                    } else {
                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            path = %matched_path,
                        )
                    }
                })
                .on_request(|_request: &Request<_>, _span: &Span| {})
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        if span.metadata().map(|m| m.level()) == Some(&tracing::Level::TRACE) {
                            return;
                        }
                        let status = response.status().as_u16();
                        if status >= 500 {
                            tracing::error!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request failed with server error"
                            );
                        } else {
                            tracing::info!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request completed"
                            );
                        }
                    },
                )
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &Span| {
                        tracing::error!(
                            error = %error,
                            latency_ms = %latency.as_millis(),
                            "request failed"
                        );
                    },
                ),
        )
        .layer(middleware::from_fn(telemetry::call_counting_middleware))
}

#[tokio::main]
async fn main() {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        match api::openapi().to_pretty_json() {
            Ok(spec) => println!("{}", spec),
            Err(e) => {
                eprintln!("Failed to render OpenAPI spec: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    telemetry::init_telemetry();

    let config = match BackendConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Invalid backend configuration: {}", e);
            std::process::exit(1);
        }
    };

    let backend = match Backend::from_config(&config) {
        Ok(b) => b,
        Err(e) => {
            tracing::error!("Failed to create backend client: {}", e);
            std::process::exit(1);
        }
    };

    match &config {
        BackendConfig::Memory { .. } => {
            tracing::warn!("Using in-memory backend; data is lost on restart")
        }
        BackendConfig::Remote(remote) => {
            tracing::info!(base_url = %remote.base_url, "Using remote backend")
        }
    }

    let cache_ttl = match cache_ttl_from_env() {
        Ok(ttl) => ttl,
        Err(e) => {
            tracing::error!("Invalid cache configuration: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(ttl_secs = cache_ttl.as_secs(), "Caching fetched lists");

    let state: AppState = Arc::new(AppContext::with_cache(
        backend,
        QueryCache::with_ttl(cache_ttl),
    ));
    let app = build_router(state);

    let bind_addr = env::var("FAMILY_TABLE_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", bind_addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server listening on {}", bind_addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", bind_addr);
    tracing::info!("OpenAPI spec available at http://{}/api-docs/openapi.json", bind_addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
