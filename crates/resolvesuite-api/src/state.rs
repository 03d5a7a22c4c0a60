//! Application state shared by every handler.

use std::sync::Arc;

use resolvesuite_core::Config;
use resolvesuite_db::ConnectionGate;
use sqlx::PgPool;

use crate::services::upload::UploadGate;

/// Process-wide state. Built once at startup and shared as `Arc<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Owner of the shared database connection.
    pub db: Arc<ConnectionGate<PgPool>>,
    pub uploads: UploadGate,
}

impl AppState {
    pub fn new(config: Config, db: Arc<ConnectionGate<PgPool>>, uploads: UploadGate) -> Self {
        Self {
            config,
            db,
            uploads,
        }
    }

    /// The database pool, if the gate has connected.
    pub fn pool(&self) -> Option<&PgPool> {
        self.db.connection()
    }
}
