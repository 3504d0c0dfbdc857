//! Document view proxy handlers.
//!
//! Proxies binary document fetches to the content backend, falling back
//! across the candidate endpoints in [`DocumentFetcher`].

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, web};
use tracing::{error, info};

use crate::models::ProxyErrorBody;
use crate::services::document_fetcher::{DocumentFetcher, UpstreamDocument};

const ALLOW_ORIGIN: &str = "*";
const ALLOW_METHODS: &str = "GET, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";
const CACHE_CONTROL: &str = "public, max-age=3600";

/// Fetch a document from the first backend candidate that serves it.
#[utoipa::path(
    get,
    path = "/api/documents/view/{filename}",
    tag = "Documents",
    params(
        ("filename" = String, Path, description = "Document file name")
    ),
    responses(
        (status = 200, description = "Document bytes with the upstream content type"),
        (status = 500, description = "Every candidate endpoint failed", body = ProxyErrorBody)
    )
)]
pub async fn view_document(
    fetcher: web::Data<DocumentFetcher>,
    path: web::Path<String>,
) -> HttpResponse {
    let file_name = path.into_inner();
    info!("Attempting to fetch document: {}", file_name);

    match fetcher.fetch(&file_name).await {
        Ok(document) => document_response(document),
        Err(err) => {
            error!("Error in document view proxy: {}", err);
            HttpResponse::InternalServerError()
                .insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN))
                .json(ProxyErrorBody {
                    error: "Failed to fetch document".to_string(),
                    details: err.to_string(),
                })
        }
    }
}

/// Answer CORS preflight for the view endpoint.
#[utoipa::path(
    options,
    path = "/api/documents/view/{filename}",
    tag = "Documents",
    params(
        ("filename" = String, Path, description = "Document file name")
    ),
    responses(
        (status = 204, description = "Preflight accepted")
    )
)]
pub async fn preflight() -> HttpResponse {
    HttpResponse::NoContent()
        .insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN))
        .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS))
        .insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS))
        .finish()
}

fn document_response(document: UpstreamDocument) -> HttpResponse {
    let status = StatusCode::from_u16(document.status.as_u16()).unwrap_or(StatusCode::OK);

    HttpResponse::build(status)
        .insert_header((header::CONTENT_TYPE, document.content_type))
        .insert_header((header::CONTENT_DISPOSITION, "inline"))
        .insert_header((header::CACHE_CONTROL, CACHE_CONTROL))
        .insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN))
        .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS))
        .insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS))
        .body(document.body)
}

/// Configure document routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/documents/view/{filename}")
            .route(web::get().to(view_document))
            .route(web::method(actix_web::http::Method::OPTIONS).to(preflight)),
    );
}
