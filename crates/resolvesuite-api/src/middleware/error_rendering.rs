//! Error rendering middleware
//!
//! Sits outside the body limit so every error leaves the service in the uniform shape.
//! In production the detail of sensitive errors is replaced with a generic message; a
//! bare 413 produced by the transport body limit is rewritten as `PayloadTooLarge`.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use resolvesuite_core::constants::MAX_UPLOAD_BYTES;
use resolvesuite_core::{AppError, DeploymentMode};

use crate::error::{redacted_response, render_error, RenderedError};

#[derive(Clone, Copy, Debug)]
pub struct ErrorRendering {
    hide_details: bool,
}

impl ErrorRendering {
    pub fn for_mode(mode: DeploymentMode) -> Self {
        Self {
            hide_details: mode.is_production(),
        }
    }
}

pub async fn error_rendering_middleware(
    State(rendering): State<ErrorRendering>,
    request: Request,
    next: Next,
) -> Response {
    let declared_length = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());

    let response = next.run(request).await;
    let status = response.status();

    match response.extensions().get::<RenderedError>().copied() {
        Some(rendered) if rendered.sensitive && rendering.hide_details => {
            redacted_response(status, rendered)
        }
        Some(_) => response,
        None if status == StatusCode::PAYLOAD_TOO_LARGE => {
            let err = AppError::PayloadTooLarge {
                size: declared_length.unwrap_or(MAX_UPLOAD_BYTES + 1),
                max: MAX_UPLOAD_BYTES,
            };
            tracing::debug!(error = %err, "Request body rejected by the transport limit");
            render_error(&err, rendering.hide_details)
        }
        None => response,
    }
}
