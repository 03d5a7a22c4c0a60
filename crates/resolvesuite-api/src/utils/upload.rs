//! Common utilities for attachment upload handlers

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use resolvesuite_core::{AppError, IncomingFile};

/// Normalize MIME type by stripping parameters (e.g. "image/png; charset=binary" -> "image/png").
fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
        .to_lowercase()
}

/// Validate the client-declared content type against the allowlist.
///
/// The declared type is trusted as-is; file contents are not sniffed. An absent or
/// malformed type is rejected like any other unlisted type.
pub fn validate_content_type(
    content_type: Option<&str>,
    allowed_types: &[&str],
) -> Result<(), AppError> {
    let Some(content_type) = content_type else {
        return Err(AppError::UnsupportedMediaType("<none>".to_string()));
    };

    let normalized = normalize_mime_type(content_type);
    if !allowed_types.iter().any(|ct| normalized == *ct) {
        return Err(AppError::UnsupportedMediaType(content_type.to_string()));
    }
    Ok(())
}

/// Validate the cumulative size of a request's file parts.
pub fn validate_total_size(total_bytes: usize, max_bytes: usize) -> Result<(), AppError> {
    if total_bytes > max_bytes {
        return Err(AppError::PayloadTooLarge {
            size: total_bytes,
            max: max_bytes,
        });
    }
    Ok(())
}

fn multipart_error(err: MultipartError, total_bytes: usize, max_bytes: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge {
            size: total_bytes,
            max: max_bytes,
        };
    }
    AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
}

/// Read every file part of a multipart body, validating as the parts stream in.
///
/// A part's declared type is checked before its bytes are read, and reading stops as soon
/// as the running total crosses `max_bytes`. Non-file fields are skipped.
pub async fn extract_multipart_files(
    mut multipart: Multipart,
    allowed_types: &[&str],
    max_bytes: usize,
) -> Result<Vec<IncomingFile>, AppError> {
    let mut files = Vec::new();
    let mut total_bytes = 0usize;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, total_bytes, max_bytes))?
    {
        let Some(original_name) = field.file_name().map(|s| s.to_string()) else {
            tracing::debug!(
                field = field.name().unwrap_or_default(),
                "Skipping non-file multipart field"
            );
            continue;
        };
        let content_type = field.content_type().map(|s| s.to_string());

        validate_content_type(content_type.as_deref(), allowed_types)?;

        let data = read_field(field, &mut total_bytes, max_bytes).await?;
        files.push(IncomingFile {
            declared_mime_type: content_type,
            original_name,
            data,
        });
    }

    Ok(files)
}

async fn read_field(
    mut field: Field<'_>,
    total_bytes: &mut usize,
    max_bytes: usize,
) -> Result<Vec<u8>, AppError> {
    let mut data = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| multipart_error(e, *total_bytes, max_bytes))?
    {
        *total_bytes += chunk.len();
        validate_total_size(*total_bytes, max_bytes)?;
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}
