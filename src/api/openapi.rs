//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "docdesk",
        version = "0.1.0",
        description = "Document proxy for the content-management admin dashboard"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        // Document endpoints
        api::documents::view_document,
        api::documents::preflight,
    ),
    components(
        schemas(
            error::ErrorResponse,
            api::health::HealthResponse,
            models::DocumentRef,
            models::ProxyErrorBody,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Documents", description = "Document retrieval proxy")
    )
)]
pub struct ApiDoc;
