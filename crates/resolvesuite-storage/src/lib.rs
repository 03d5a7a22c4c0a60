//! ResolveSuite Storage Library
//!
//! Attachment persistence for the upload pipeline: where files go (resolved once per
//! process from the deployment mode), what they are called, and how bytes reach disk.
//!
//! # Layout
//!
//! Every accepted file lands at `<storage location>/<assigned name>`. Assigned names are
//! a single path segment of the form `<unix millis>-<random>-<sanitized original name>`.

pub mod local;
pub mod location;
pub mod naming;
pub mod traits;

// Re-export commonly used types
pub use local::LocalDiskStore;
pub use location::{resolve_storage_location, DirectoryProvisioner, OsDirectories, StorageLocation};
pub use naming::{assign_name, sanitize_original_name};
pub use traits::{AttachmentStore, StorageError, StorageResult};
