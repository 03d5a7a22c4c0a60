//! PostgreSQL connector backed by an sqlx pool.

use std::time::Duration;

use async_trait::async_trait;
use resolvesuite_core::Config;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::gate::{ConnectionError, Connector};

/// Opens the shared PostgreSQL pool.
#[derive(Clone, Debug)]
pub struct PgConnector {
    database_url: Option<String>,
    max_connections: u32,
    timeout: Duration,
}

impl PgConnector {
    pub fn new(database_url: Option<String>, max_connections: u32, timeout: Duration) -> Self {
        Self {
            database_url,
            max_connections,
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.database_url.clone(),
            config.db_max_connections,
            Duration::from_secs(config.db_timeout_seconds),
        )
    }
}

#[async_trait]
impl Connector<PgPool> for PgConnector {
    async fn connect(&self) -> Result<PgPool, ConnectionError> {
        let url = self
            .database_url
            .as_deref()
            .ok_or(ConnectionError::NotConfigured)?;

        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.timeout)
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .connect(url)
            .await
            .map_err(|e| ConnectionError::Connect(e.to_string()))?;

        tracing::info!(
            max_connections = self.max_connections,
            "Database pool established"
        );

        Ok(pool)
    }
}
