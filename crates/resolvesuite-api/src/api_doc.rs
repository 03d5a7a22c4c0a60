//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use crate::setup::routes::health;
use resolvesuite_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ResolveSuite API",
        version = "0.1.0",
        description = "Complaint management request gateway: health checks and complaint attachment intake."
    ),
    paths(
        health::health_check,
        health::readiness_check,
        handlers::attachments::upload_attachments,
    ),
    components(schemas(
        error::ErrorResponse,
        models::StoredFile,
        handlers::attachments::AttachmentUploadResponse,
        health::HealthResponse,
        health::ReadinessResponse,
    )),
    tags(
        (name = "health", description = "Liveness and readiness checks"),
        (name = "complaints", description = "Complaint attachments")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
