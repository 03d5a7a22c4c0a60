//! Connection gate middleware
//!
//! Runs ahead of route dispatch so the shared database connection is established before
//! any domain handler executes. A failed attempt never rejects the request; handlers that
//! need the database see an unready gate and answer 503 themselves.
//!
//! The liveness route only starts an attempt and reports the current state, so it stays
//! fast while the database is unreachable. Every other route waits for the attempt, which
//! can take up to `DB_TIMEOUT_SECONDS` per retry while the backend is down.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::constants::API_BASE;
use crate::state::AppState;

fn is_liveness_route(path: &str) -> bool {
    path.strip_prefix(API_BASE) == Some("/health")
}

pub async fn connection_gate_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if is_liveness_route(request.uri().path()) {
        state.db.begin();
    } else if let Err(e) = state.db.ensure_ready().await {
        tracing::debug!(
            error = %e,
            method = %request.method(),
            path = %request.uri().path(),
            "Continuing request without a ready database"
        );
    }

    next.run(request).await
}
