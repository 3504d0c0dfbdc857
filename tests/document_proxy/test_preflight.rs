//! E2E tests: CORS preflight.

use actix_web::http::{Method, header};
use actix_web::test;

use super::test_helpers::*;

/// OPTIONS → 204 with no body and the allow headers, for any file name.
#[actix_rt::test]
async fn test_preflight_for_any_file_name() {
    // The backend is never contacted for preflight.
    let app = create_proxy_app("http://127.0.0.1:1").await;

    for name in ["report.pdf", "no-extension", "q3%20summary.docx"] {
        let req = test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri(&format!("/api/documents/view/{}", name))
            .insert_header((header::ORIGIN, "http://localhost:3000"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "GET"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 204, "preflight for {}", name);
        let headers = resp.headers();
        assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
            "GET, OPTIONS"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
            "Content-Type, Authorization"
        );
        assert!(test::read_body(resp).await.is_empty());
    }
}
