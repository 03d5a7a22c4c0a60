//! Application setup and initialization
//!
//! Everything `main` needs to go from a loaded [`Config`] to a ready router. The router
//! assembly is also exposed on its own so tests can inject a connector and a store.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use resolvesuite_core::Config;
use resolvesuite_db::ConnectionGate;
use resolvesuite_storage::AttachmentStore;
use sqlx::PgPool;

use crate::services::upload::UploadGate;
use crate::state::AppState;
pub use routes::DomainRoutes;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.mode);
    tracing::info!(mode = %config.mode, "Configuration loaded and validated successfully");

    let gate = database::setup_database(&config);
    database::warm_up(gate.clone());

    let store = storage::setup_storage(&config).await;

    assemble(config, gate, store, DomainRoutes::new())
}

/// Build the state and router from already-constructed parts.
pub fn assemble(
    config: Config,
    gate: Arc<ConnectionGate<PgPool>>,
    store: Arc<dyn AttachmentStore>,
    domains: DomainRoutes,
) -> Result<(Arc<AppState>, axum::Router)> {
    let state = Arc::new(AppState::new(config, gate, UploadGate::new(store)));
    let router = routes::setup_routes(&state.config, state.clone(), domains)?;
    Ok((state, router))
}
