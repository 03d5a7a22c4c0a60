//! Storage abstraction trait
//!
//! This module defines the attachment store used by the upload pipeline and the errors
//! it reports.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use resolvesuite_core::{AppError, StoredFile};
use thiserror::Error;

use crate::location::StorageLocation;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to remove {}: {source}", .path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to provision storage directory {}: {source}", .path.display())]
    Provision {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid attachment name: {0}")]
    InvalidName(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Write { .. } | StorageError::Remove { .. } => {
                AppError::StorageWrite(err.to_string())
            }
            StorageError::Provision { .. } => AppError::DirectoryProvision(err.to_string()),
            StorageError::InvalidName(msg) => AppError::InvalidInput(msg),
        }
    }
}

/// Attachment store
///
/// Writes accepted attachments under a fixed [`StorageLocation`]. Implementations must not
/// create the location directory themselves; a missing directory is a write failure.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Directory every attachment is written into.
    fn location(&self) -> &StorageLocation;

    /// Persist `data` as `location/assigned_name`.
    async fn store(&self, assigned_name: &str, data: &[u8]) -> StorageResult<StoredFile>;

    /// Remove a previously stored attachment. Missing files are not an error.
    async fn remove(&self, assigned_name: &str) -> StorageResult<()>;
}
