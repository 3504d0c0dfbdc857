//! Request logging middleware.
//!
//! Every request runs inside a `request` span, so the proxy's per-candidate
//! logs carry the method and path of the request that caused them.

use actix_web::Error;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{self, HeaderMap};
use actix_web::middleware::Next;
use std::time::Instant;
use tracing::{Instrument, info, info_span, warn};

/// Log request start and completion under the `api` target.
///
/// Install with `actix_web::middleware::from_fn(log_request)`.
pub async fn log_request(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let start = Instant::now();
    let span = info_span!(
        target: "api",
        "request",
        method = %req.method(),
        path = %req.path(),
    );

    let origin = header_value(req.headers(), header::ORIGIN, "none");
    let remote_addr = req
        .connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_string();

    span.in_scope(|| {
        info!(target: "api", remote_addr = %remote_addr, origin = %origin, "→ Request started")
    });

    let res = next.call(req).instrument(span.clone()).await?;
    let status = res.status();
    let duration_ms = start.elapsed().as_millis();

    span.in_scope(|| {
        if status.is_success() {
            let content_type = header_value(res.headers(), header::CONTENT_TYPE, "-");
            info!(
                target: "api",
                status = %status.as_u16(),
                content_type = %content_type,
                duration_ms = %duration_ms,
                "← Request completed"
            );
        } else {
            warn!(
                target: "api",
                status = %status.as_u16(),
                duration_ms = %duration_ms,
                "← Request failed"
            );
        }
    });

    Ok(res)
}

fn header_value(headers: &HeaderMap, name: header::HeaderName, fallback: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(fallback)
        .to_string()
}
