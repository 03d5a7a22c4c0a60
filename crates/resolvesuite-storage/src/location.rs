//! Storage location resolution
//!
//! The attachment directory is chosen once at process start. Production (serverless)
//! deployments write into a fixed ephemeral directory that already exists; we never try
//! to create it. Development deployments use a local directory that is created on demand.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use resolvesuite_core::constants::PRODUCTION_UPLOAD_DIR;
use resolvesuite_core::DeploymentMode;

use crate::traits::StorageError;

/// Directory attachments are written into, fixed for the process lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageLocation {
    path: PathBuf,
    mode: DeploymentMode,
}

impl StorageLocation {
    pub fn new(path: impl Into<PathBuf>, mode: DeploymentMode) -> Self {
        Self {
            path: path.into(),
            mode,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> DeploymentMode {
        self.mode
    }
}

/// Filesystem operations needed to provision the storage directory.
#[async_trait]
pub trait DirectoryProvisioner: Send + Sync {
    async fn exists(&self, path: &Path) -> bool;

    async fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// Provisioner backed by the real filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsDirectories;

#[async_trait]
impl DirectoryProvisioner for OsDirectories {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        tokio::fs::create_dir_all(path).await
    }
}

/// Resolve the attachment directory for `mode`.
///
/// Production returns [`PRODUCTION_UPLOAD_DIR`] and touches nothing. Development returns
/// `local_dir` (made absolute against the working directory) and creates it when missing.
/// A creation failure is logged and the path is still returned; writes will then fail
/// individually.
pub async fn resolve_storage_location(
    mode: DeploymentMode,
    local_dir: &Path,
    provisioner: &dyn DirectoryProvisioner,
) -> StorageLocation {
    if mode.is_production() {
        tracing::info!(
            path = PRODUCTION_UPLOAD_DIR,
            "Using ephemeral upload directory"
        );
        return StorageLocation::new(PRODUCTION_UPLOAD_DIR, mode);
    }

    let path = absolutize(local_dir);

    if !provisioner.exists(&path).await {
        match provisioner.create_dir_all(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Created local upload directory");
            }
            Err(source) => {
                let err = StorageError::Provision {
                    path: path.clone(),
                    source,
                };
                tracing::warn!(error = %err, "Could not create uploads directory");
            }
        }
    } else {
        tracing::debug!(path = %path.display(), "Using existing local upload directory");
    }

    StorageLocation::new(path, mode)
}

fn absolutize(dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        return dir.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(dir),
        Err(_) => dir.to_path_buf(),
    }
}
