//! Attachment intake service
//!
//! The gate validates every file part of a request before anything is written. The first
//! violation (unsupported declared type, or the aggregate size ceiling) rejects the whole
//! request; only a fully valid request reaches naming and storage.

use std::sync::Arc;

use axum::extract::Multipart;
use resolvesuite_core::constants::{ALLOWED_MIME_TYPES, MAX_UPLOAD_BYTES};
use resolvesuite_core::{AppError, IncomingFile, StoredFile};
use resolvesuite_storage::{assign_name, AttachmentStore};

use crate::utils::upload::{extract_multipart_files, validate_content_type, validate_total_size};

/// Per-request attachment intake over a shared, immutable storage location.
#[derive(Clone)]
pub struct UploadGate {
    store: Arc<dyn AttachmentStore>,
    max_request_bytes: usize,
}

impl UploadGate {
    pub fn new(store: Arc<dyn AttachmentStore>) -> Self {
        Self {
            store,
            max_request_bytes: MAX_UPLOAD_BYTES,
        }
    }

    /// Check a part's declared media type against the allowlist.
    pub fn validate_file(&self, file: &IncomingFile) -> Result<(), AppError> {
        validate_content_type(file.declared_mime_type.as_deref(), ALLOWED_MIME_TYPES)
    }

    /// Check the cumulative size of the request's file parts.
    pub fn validate_size(&self, total_request_bytes: usize) -> Result<(), AppError> {
        validate_total_size(total_request_bytes, self.max_request_bytes)
    }

    /// Accept the file parts of a multipart request.
    pub async fn accept(&self, multipart: Multipart) -> Result<Vec<StoredFile>, AppError> {
        let files =
            extract_multipart_files(multipart, ALLOWED_MIME_TYPES, self.max_request_bytes).await?;
        self.persist(files).await
    }

    /// Validate and persist already-buffered file parts.
    pub async fn ingest(&self, files: Vec<IncomingFile>) -> Result<Vec<StoredFile>, AppError> {
        let mut total_bytes = 0usize;
        for file in &files {
            self.validate_file(file)?;
            total_bytes += file.size();
            self.validate_size(total_bytes)?;
        }
        self.persist(files).await
    }

    /// Name and store validated files. If a write fails, files already written for this
    /// request are removed before the error is returned.
    async fn persist(&self, files: Vec<IncomingFile>) -> Result<Vec<StoredFile>, AppError> {
        let mut stored: Vec<StoredFile> = Vec::with_capacity(files.len());

        for file in files {
            let assigned_name = assign_name(&file.original_name);
            match self.store.store(&assigned_name, &file.data).await {
                Ok(result) => stored.push(result),
                Err(err) => {
                    tracing::error!(
                        error = %err,
                        original_filename = %file.original_name,
                        "Failed to store attachment"
                    );
                    self.roll_back(&stored).await;
                    return Err(err.into());
                }
            }
        }

        if !stored.is_empty() {
            tracing::info!(
                files = stored.len(),
                total_bytes = stored.iter().map(|f| f.size_bytes).sum::<u64>(),
                "Attachments accepted"
            );
        }

        Ok(stored)
    }

    async fn roll_back(&self, stored: &[StoredFile]) {
        for file in stored {
            if let Err(e) = self.store.remove(&file.assigned_name).await {
                tracing::warn!(
                    error = %e,
                    assigned_name = %file.assigned_name,
                    "Failed to remove attachment after aborted upload"
                );
            }
        }
    }
}
