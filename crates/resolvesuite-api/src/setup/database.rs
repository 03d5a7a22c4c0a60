//! Database gate setup

use std::sync::Arc;

use resolvesuite_core::Config;
use resolvesuite_db::{ConnectionGate, PgConnector};
use sqlx::PgPool;

/// Build the connection gate. No connection is attempted here.
pub fn setup_database(config: &Config) -> Arc<ConnectionGate<PgPool>> {
    if config.database_url.is_none() {
        tracing::warn!("DATABASE_URL is not set; database-backed routes will be unavailable");
    }
    Arc::new(ConnectionGate::new(Arc::new(PgConnector::from_config(
        config,
    ))))
}

/// Start connecting in the background so the first request rarely waits. Requests that
/// arrive meanwhile join the same attempt.
pub fn warm_up<T>(gate: Arc<ConnectionGate<T>>)
where
    T: Send + Sync + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = gate.ensure_ready().await {
            tracing::warn!(error = %e, "Database warm-up failed; the next request will retry");
        }
    });
}
