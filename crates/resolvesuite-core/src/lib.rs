//! ResolveSuite Core Library
//!
//! This crate provides the configuration, error taxonomy, constants and shared models
//! used by the ResolveSuite request gateway crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{Config, DeploymentMode};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{IncomingFile, StoredFile};
