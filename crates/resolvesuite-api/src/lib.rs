//! ResolveSuite API Library
//!
//! This crate provides the HTTP surface of the request gateway: the connection gate
//! middleware, the attachment upload pipeline, health routes, domain service mounts and
//! application setup.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
mod middleware;
mod telemetry;
mod utils;

// Public modules
pub mod error;
pub mod services;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::upload::UploadGate;
pub use setup::routes::DomainRoutes;
pub use state::AppState;
