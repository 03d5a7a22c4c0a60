//! Shared constants for attachment intake and service defaults.

/// Aggregate ceiling for the file parts of a single upload request (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Declared media types accepted for attachments.
pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "application/pdf"];

/// Pre-existing ephemeral directory used for attachments in production (serverless) mode.
pub const PRODUCTION_UPLOAD_DIR: &str = "/tmp/uploads";

/// Development storage directory, relative to the working directory.
pub const DEFAULT_LOCAL_UPLOAD_DIR: &str = "uploads";

pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";

/// Banner returned by `GET /`.
pub const SERVICE_BANNER: &str = "ResolveSuite API is running";
