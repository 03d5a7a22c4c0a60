//! API constants.

use resolvesuite_core::constants::MAX_UPLOAD_BYTES;

/// API base path prefix
pub const API_BASE: &str = "/api";

/// Hard cap on request bodies. Twice the attachment ceiling leaves room for multipart
/// framing and text fields so the upload pipeline, not the body limit, reports oversize
/// attachments.
pub const MAX_REQUEST_BODY_BYTES: usize = MAX_UPLOAD_BYTES * 2;
