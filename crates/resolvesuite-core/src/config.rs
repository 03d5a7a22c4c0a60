//! Configuration module
//!
//! Service configuration is read from the process environment (and an optional `.env`
//! file). Everything except the listen port falls back to a default when missing or
//! unparseable, so a cold-started serverless instance always comes up.

use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::constants::{DEFAULT_FRONTEND_URL, DEFAULT_LOCAL_UPLOAD_DIR};

// Common constants
const SERVER_PORT: u16 = 5000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 10;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// Deployment mode, selecting production (serverless) or development behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeploymentMode {
    Production,
    Development,
}

impl DeploymentMode {
    /// Parse a mode flag such as `NODE_ENV`. Only `production`/`prod` select production.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => DeploymentMode::Production,
            _ => DeploymentMode::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, DeploymentMode::Production)
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentMode::Production => f.write_str("production"),
            DeploymentMode::Development => f.write_str("development"),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub mode: DeploymentMode,
    /// Single origin allowed to call the API with credentials.
    pub frontend_url: String,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    /// Attachment directory used outside production.
    pub local_upload_dir: PathBuf,
    pub http_concurrency_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("NODE_ENV")
            .or_else(|| lookup("ENVIRONMENT"))
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let server_port = match lookup("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => SERVER_PORT,
        };

        let frontend_url = lookup("FRONTEND_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string());

        let database_url = lookup("DATABASE_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Config {
            server_port,
            mode: DeploymentMode::parse(&environment),
            frontend_url,
            database_url,
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: lookup("DB_TIMEOUT_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            local_upload_dir: lookup("LOCAL_UPLOAD_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOCAL_UPLOAD_DIR)),
            http_concurrency_limit: lookup("HTTP_CONCURRENCY_LIMIT")
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.frontend_url.starts_with("http://") || self.frontend_url.starts_with("https://"))
        {
            return Err(anyhow::anyhow!(
                "FRONTEND_URL must be an http(s) origin, got '{}'",
                self.frontend_url
            ));
        }

        if self.db_max_connections == 0 {
            return Err(anyhow::anyhow!("DB_MAX_CONNECTIONS must be greater than zero"));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        self.mode.is_production()
    }
}
