//! Route configuration and setup.
//!
//! Domain mounts live in [domains](domains); health checks in [health](health).

mod domains;
pub mod health;

pub use domains::{mount_path, service_for_path, DomainRoutes, DOMAIN_SERVICES};

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, Uri},
    routing::get,
    Json, Router,
};
use resolvesuite_core::constants::SERVICE_BANNER;
use resolvesuite_core::{AppError, Config};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::constants::{API_BASE, MAX_REQUEST_BODY_BYTES};
use crate::error::{handle_panic, HttpAppError};
use crate::middleware::{connection_gate_middleware, error_rendering_middleware, ErrorRendering};
use crate::state::AppState;

/// Setup all application routes
pub fn setup_routes(
    config: &Config,
    state: Arc<AppState>,
    domains: DomainRoutes,
) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let registered: Arc<HashSet<String>> = Arc::new(domains.registered().into_iter().collect());
    tracing::info!(
        registered = ?registered,
        "Domain services registered"
    );

    let http_concurrency_limit = config.http_concurrency_limit.max(1);
    tracing::info!(
        http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    let app = Router::new()
        .route("/", get(root))
        .merge(health_routes())
        .route(
            &format!("{}/openapi.json", API_BASE),
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .merge(domains.into_router())
        .fallback(move |uri: Uri| {
            let registered = registered.clone();
            async move { fallback(&registered, &uri) }
        })
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            connection_gate_middleware,
        ))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .layer(axum::middleware::from_fn_with_state(
            ErrorRendering::for_mode(config.mode),
            error_rendering_middleware,
        ))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Single-origin CORS with credentials.
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let origin: HeaderValue = config.frontend_url.parse().map_err(|e| {
        anyhow::anyhow!("Invalid FRONTEND_URL '{}': {}", config.frontend_url, e)
    })?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]))
}

fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(&format!("{}/health", API_BASE), get(health::health_check))
        .route(
            &format!("{}/health/ready", API_BASE),
            get(health::readiness_check),
        )
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": SERVICE_BANNER }))
}

fn fallback(registered: &HashSet<String>, uri: &Uri) -> HttpAppError {
    let path = uri.path();
    match service_for_path(path) {
        Some(service) if !registered.contains(service) => HttpAppError(
            AppError::NotImplemented(format!("The {} service is not available", service)),
        ),
        _ => HttpAppError(AppError::NotFound(format!("No route for {}", path))),
    }
}
