//! Shared models for attachment intake.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One file part of an upload request, as declared by the client.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    /// Client-declared media type; `None` when the part carried no Content-Type.
    pub declared_mime_type: Option<String>,
    pub original_name: String,
    pub data: Vec<u8>,
}

impl IncomingFile {
    pub fn new(
        declared_mime_type: Option<impl Into<String>>,
        original_name: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            declared_mime_type: declared_mime_type.map(Into::into),
            original_name: original_name.into(),
            data,
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// A persisted attachment. The downstream handler owns recording `storage_path`
/// against its domain entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub storage_path: String,
    pub assigned_name: String,
    pub size_bytes: u64,
}
