//! HTTP error response conversion
//!
//! This module provides HTTP-specific error response conversion for AppError.
//!
//! **Preferred handler pattern:** Return `Result<impl IntoResponse, HttpAppError>` and use
//! `?` on anything that converts into `AppError`, so every failure renders the same body:
//! `{"error": <status reason>, "message": <detail>, "code": <machine code>}`.

use std::any::Any;

use axum::{
    extract::multipart::MultipartRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use resolvesuite_core::{AppError, ErrorMetadata, LogLevel};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const GENERIC_SERVER_MESSAGE: &str = "An unexpected error occurred";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Reason phrase of the HTTP status, e.g. "Internal Server Error"
    pub error: String,
    /// Human-readable detail
    pub message: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from resolvesuite-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<MultipartRejection> for HttpAppError {
    fn from(rejection: MultipartRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Expected a multipart/form-data body: {}",
            rejection.body_text()
        )))
    }
}

fn log_error(error: &AppError) {
    let error_code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_code, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_code, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_code, "Request failed");
        }
    }
}

/// Build the response body for an error, hiding sensitive detail when `hide_details`.
pub fn error_body(app_error: &AppError, hide_details: bool) -> (StatusCode, ErrorResponse) {
    let status = StatusCode::from_u16(app_error.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = if hide_details && app_error.is_sensitive() {
        GENERIC_SERVER_MESSAGE.to_string()
    } else {
        app_error.client_message()
    };

    let body = ErrorResponse {
        error: status
            .canonical_reason()
            .unwrap_or("Internal Server Error")
            .to_string(),
        message,
        code: app_error.error_code().to_string(),
    };
    (status, body)
}

/// Attached to every rendered error response so outer layers can tell uniform error
/// bodies apart and redact sensitive ones for the deployment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderedError {
    pub code: &'static str,
    pub sensitive: bool,
}

/// Build an error response with its [`RenderedError`] marker.
pub fn render_error(app_error: &AppError, hide_details: bool) -> Response {
    let (status, body) = error_body(app_error, hide_details);
    let mut response = (status, Json(body)).into_response();
    response.extensions_mut().insert(RenderedError {
        code: app_error.error_code(),
        sensitive: app_error.is_sensitive(),
    });
    response
}

/// The production form of a sensitive error: status and code survive, detail does not.
pub fn redacted_response(status: StatusCode, rendered: RenderedError) -> Response {
    let body = ErrorResponse {
        error: status
            .canonical_reason()
            .unwrap_or("Internal Server Error")
            .to_string(),
        message: GENERIC_SERVER_MESSAGE.to_string(),
        code: rendered.code.to_string(),
    };
    let mut response = (status, Json(body)).into_response();
    response.extensions_mut().insert(rendered);
    response
}

/// Renders with full detail; the error rendering middleware redacts in production.
impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        log_error(&self.0);
        render_error(&self.0, false)
    }
}

/// Converts a handler panic into the uniform 500 response.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    HttpAppError(AppError::Internal(detail)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_use_the_uniform_shape() {
        let (status, body) = error_body(&AppError::Internal("db exploded".to_string()), false);

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Internal Server Error");
        assert_eq!(body.message, "db exploded");
        assert_eq!(body.code, "INTERNAL_ERROR");
    }

    #[test]
    fn production_hides_sensitive_details() {
        let (_, body) = error_body(
            &AppError::StorageWrite("/srv/secret/path: permission denied".to_string()),
            true,
        );
        assert_eq!(body.message, GENERIC_SERVER_MESSAGE);

        // Client errors keep their detail even in production.
        let (status, body) = error_body(
            &AppError::UnsupportedMediaType("application/zip".to_string()),
            true,
        );
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(body.message.contains("application/zip"));
    }

    #[test]
    fn size_and_type_violations_are_distinguishable() {
        let (type_status, type_body) =
            error_body(&AppError::UnsupportedMediaType("text/plain".into()), false);
        let (size_status, size_body) = error_body(
            &AppError::PayloadTooLarge {
                size: 11,
                max: 10,
            },
            false,
        );

        assert_ne!(type_status, size_status);
        assert_eq!(type_body.code, "UNSUPPORTED_MEDIA_TYPE");
        assert_eq!(size_body.code, "PAYLOAD_TOO_LARGE");
        assert_eq!(size_body.error, "Payload Too Large");
    }

    #[test]
    fn rendered_errors_carry_their_marker() {
        let response = HttpAppError(AppError::StorageWrite("disk full".into())).into_response();

        assert_eq!(
            response.extensions().get::<RenderedError>(),
            Some(&RenderedError {
                code: "STORAGE_WRITE_ERROR",
                sensitive: true,
            })
        );
    }

    #[test]
    fn panics_become_internal_server_errors() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_response_serializes_expected_fields() {
        let json = serde_json::to_value(ErrorResponse {
            error: "Internal Server Error".to_string(),
            message: "detail".to_string(),
            code: "INTERNAL_ERROR".to_string(),
        })
        .expect("serialize");
        assert_eq!(json["error"], "Internal Server Error");
        assert_eq!(json["message"], "detail");
        assert!(json.is_object());
    }
}
