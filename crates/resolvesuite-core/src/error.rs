//! Error types module
//!
//! All request-facing failures are unified under [`AppError`]. Each variant describes
//! how it should be presented over HTTP through the [`ErrorMetadata`] trait, so the
//! API crate can render a uniform body without matching on variants itself.


/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like an unreachable backend
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "PAYLOAD_TOO_LARGE")
    fn error_code(&self) -> &'static str;

    /// Client-facing message
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Payload too large: {size} bytes exceeds the {max} byte limit")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Storage write error: {0}")]
    StorageWrite(String),

    #[error("Directory provision error: {0}")]
    DirectoryProvision(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Static metadata for each variant: (http_status, error_code, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::Connection(_) => (503, "DATABASE_UNAVAILABLE", true, LogLevel::Warn),
        AppError::UnsupportedMediaType(_) => {
            (415, "UNSUPPORTED_MEDIA_TYPE", false, LogLevel::Debug)
        }
        AppError::PayloadTooLarge { .. } => (413, "PAYLOAD_TOO_LARGE", false, LogLevel::Debug),
        AppError::StorageWrite(_) => (500, "STORAGE_WRITE_ERROR", true, LogLevel::Error),
        AppError::DirectoryProvision(_) => {
            (500, "DIRECTORY_PROVISION_ERROR", true, LogLevel::Error)
        }
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, LogLevel::Debug),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, LogLevel::Debug),
        AppError::NotImplemented(_) => (501, "NOT_IMPLEMENTED", false, LogLevel::Debug),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, LogLevel::Error),
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn client_message(&self) -> String {
        match self {
            AppError::UnsupportedMediaType(content_type) => format!(
                "Invalid file type '{}'. Only JPG, PNG & PDF files are allowed.",
                content_type
            ),
            AppError::PayloadTooLarge { max, .. } => format!(
                "Upload exceeds the maximum total size of {} MB",
                max / 1024 / 1024
            ),
            AppError::Connection(msg)
            | AppError::StorageWrite(msg)
            | AppError::DirectoryProvision(msg)
            | AppError::InvalidInput(msg)
            | AppError::NotFound(msg)
            | AppError::NotImplemented(msg)
            | AppError::Internal(msg) => msg.clone(),
        }
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }
}
