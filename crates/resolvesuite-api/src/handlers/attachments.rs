//! Complaint attachment upload handler

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use resolvesuite_core::StoredFile;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AttachmentUploadResponse {
    /// Accepted files, in the order their parts arrived
    pub files: Vec<StoredFile>,
}

#[utoipa::path(
    post,
    path = "/api/complaints/attachments",
    tag = "complaints",
    request_body(
        content = String,
        description = "Multipart form with one or more file parts (JPG, PNG or PDF, 10 MB total)",
        content_type = "multipart/form-data"
    ),
    responses(
        (status = 201, description = "Attachments stored", body = AttachmentUploadResponse),
        (status = 400, description = "Malformed multipart body", body = ErrorResponse),
        (status = 413, description = "Attachments exceed the total size limit", body = ErrorResponse),
        (status = 415, description = "Unsupported attachment type", body = ErrorResponse),
        (status = 500, description = "Attachment could not be written", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn upload_attachments(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<AttachmentUploadResponse>), HttpAppError> {
    let multipart = multipart?;
    let files = state.uploads.accept(multipart).await?;

    tracing::debug!(count = files.len(), "Attachment upload completed");

    Ok((StatusCode::CREATED, Json(AttachmentUploadResponse { files })))
}
