use std::path::{Path, PathBuf};

use async_trait::async_trait;
use resolvesuite_core::StoredFile;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::location::StorageLocation;
use crate::traits::{AttachmentStore, StorageError, StorageResult};

/// Local filesystem attachment store
///
/// Bytes are written to a hidden temporary file next to the target, synced, then renamed
/// into place, so a crash mid-write never leaves a truncated file under the final name.
#[derive(Clone, Debug)]
pub struct LocalDiskStore {
    location: StorageLocation,
}

impl LocalDiskStore {
    pub fn new(location: StorageLocation) -> Self {
        Self { location }
    }

    /// Resolve an assigned name to its path, rejecting anything that is not a single
    /// plain path segment.
    fn name_to_path(&self, assigned_name: &str) -> StorageResult<PathBuf> {
        if assigned_name.is_empty()
            || assigned_name.starts_with('.')
            || assigned_name.contains(['/', '\\', '\0'])
        {
            return Err(StorageError::InvalidName(assigned_name.to_string()));
        }
        Ok(self.location.path().join(assigned_name))
    }

    fn temp_path_for(&self, assigned_name: &str) -> PathBuf {
        self.location
            .path()
            .join(format!(".{}.part", assigned_name))
    }

    async fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
        let mut file = fs::File::create(path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        Ok(())
    }
}

#[async_trait]
impl AttachmentStore for LocalDiskStore {
    fn location(&self) -> &StorageLocation {
        &self.location
    }

    async fn store(&self, assigned_name: &str, data: &[u8]) -> StorageResult<StoredFile> {
        let path = self.name_to_path(assigned_name)?;
        let temp_path = self.temp_path_for(assigned_name);
        let start = std::time::Instant::now();

        if let Err(source) = Self::write_synced(&temp_path, data).await {
            discard_temp(&temp_path).await;
            return Err(StorageError::Write { path, source });
        }

        if let Err(source) = fs::rename(&temp_path, &path).await {
            discard_temp(&temp_path).await;
            return Err(StorageError::Write { path, source });
        }

        tracing::info!(
            path = %path.display(),
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Attachment stored"
        );

        Ok(StoredFile {
            storage_path: path.to_string_lossy().into_owned(),
            assigned_name: assigned_name.to_string(),
            size_bytes: data.len() as u64,
        })
    }

    async fn remove(&self, assigned_name: &str) -> StorageResult<()> {
        let path = self.name_to_path(assigned_name)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Attachment removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Remove { path, source }),
        }
    }
}

async fn discard_temp(temp_path: &Path) {
    if let Err(e) = fs::remove_file(temp_path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(
                path = %temp_path.display(),
                error = %e,
                "Failed to remove partial upload"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resolvesuite_core::DeploymentMode;
    use tempfile::tempdir;

    fn store_in(dir: &Path) -> LocalDiskStore {
        LocalDiskStore::new(StorageLocation::new(dir, DeploymentMode::Development))
    }

    #[tokio::test]
    async fn stores_bytes_under_assigned_name() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        let stored = store
            .store("1700000000000-42-scan.png", b"png bytes")
            .await
            .unwrap();

        let expected = dir.path().join("1700000000000-42-scan.png");
        assert_eq!(stored.storage_path, expected.to_string_lossy());
        assert_eq!(stored.assigned_name, "1700000000000-42-scan.png");
        assert_eq!(stored.size_bytes, 9);
        assert_eq!(std::fs::read(&expected).unwrap(), b"png bytes");
    }

    #[tokio::test]
    async fn leaves_no_temporary_files_behind() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        store.store("1-2-a.pdf", b"%PDF-1.7").await.unwrap();

        let entries: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, vec!["1-2-a.pdf".to_string()]);
    }

    #[tokio::test]
    async fn missing_directory_is_a_write_error() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir.path().join("never-created"));

        let result = store.store("1-2-a.png", b"data").await;

        assert!(matches!(result, Err(StorageError::Write { .. })));
        assert!(!dir.path().join("never-created").exists());
    }

    #[tokio::test]
    async fn rejects_names_that_are_not_a_single_segment() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        for name in ["", "../escape.png", "a/b.png", ".hidden", "a\\b.png"] {
            assert!(
                matches!(store.store(name, b"x").await, Err(StorageError::InvalidName(_))),
                "name {:?} should be rejected",
                name
            );
        }
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        store.store("1-2-a.png", b"data").await.unwrap();
        store.remove("1-2-a.png").await.unwrap();
        store.remove("1-2-a.png").await.unwrap();

        assert!(!dir.path().join("1-2-a.png").exists());
    }
}
