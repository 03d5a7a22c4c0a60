//! Health check handlers and response types.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

const READINESS_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Connection gate state: unconnected, connecting, ready or failed
    pub database: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadinessResponse {
    pub status: String,
    pub database: String,
}

/// Liveness check; reports the connection state without touching the database.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses((status = 200, description = "Service is running", body = HealthResponse))
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        database: state.db.state().label().to_string(),
    })
}

/// Readiness check: the database connection is established and answers queries.
#[utoipa::path(
    get,
    path = "/api/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Ready to serve", body = ReadinessResponse),
        (status = 503, description = "Database unavailable", body = ReadinessResponse)
    )
)]
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = match state.pool() {
        None => format!("not_ready: {}", state.db.state().label()),
        Some(pool) => {
            match tokio::time::timeout(READINESS_TIMEOUT, sqlx::query("SELECT 1").execute(pool))
                .await
            {
                Ok(Ok(_)) => "ready".to_string(),
                Ok(Err(e)) => {
                    tracing::error!(error = %e, "Database readiness check failed");
                    format!("not_ready: {}", e)
                }
                Err(_) => {
                    tracing::error!("Database readiness check timed out");
                    "timeout".to_string()
                }
            }
        }
    };

    let ready = database == "ready";
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadinessResponse {
            status: if ready { "ready" } else { "not_ready" }.to_string(),
            database,
        }),
    )
}
