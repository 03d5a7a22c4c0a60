//! Attachment storage setup

use std::sync::Arc;

use resolvesuite_core::Config;
use resolvesuite_storage::{resolve_storage_location, AttachmentStore, LocalDiskStore, OsDirectories};

/// Resolve the attachment directory for the deployment mode and open the local store.
pub async fn setup_storage(config: &Config) -> Arc<dyn AttachmentStore> {
    let location =
        resolve_storage_location(config.mode, &config.local_upload_dir, &OsDirectories).await;

    tracing::info!(
        path = %location.path().display(),
        mode = %location.mode(),
        "Attachment storage initialized"
    );

    Arc::new(LocalDiskStore::new(location))
}
