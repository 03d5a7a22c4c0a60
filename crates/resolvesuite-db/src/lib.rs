//! ResolveSuite Database Library
//!
//! Lazy, single-flight establishment of the shared database connection.
//!
//! The [`ConnectionGate`] owns the connection lifecycle for the whole process. Requests
//! call [`ConnectionGate::ensure_ready`] before reaching domain handlers; the first call
//! performs the connection attempt and every overlapping call waits for that same attempt.

pub mod gate;
pub mod postgres;

// Re-export commonly used types
pub use gate::{ConnectionError, ConnectionGate, ConnectionState, Connector};
pub use postgres::PgConnector;
