//! E2E tests: proxy client retry policy.

use std::time::Duration;

use docdesk_lib::viewer::{DocumentSource, ProxyClient, ViewError, ViewOptions};

use super::mock_backend::{MockBackend, MockReply};
use super::test_helpers::*;

fn options(attempts: u32, timeout_ms: u64) -> ViewOptions {
    ViewOptions {
        retry_attempts: attempts,
        timeout: Duration::from_millis(timeout_ms),
        retry_backoff: Duration::from_millis(10),
    }
}

/// Proxy keeps failing → the client spends its whole attempt budget.
#[actix_rt::test]
async fn test_client_retries_until_budget_exhausted() {
    let backend = MockBackend::start().await;
    let proxy_url = spawn_proxy(&backend.base_url);
    let client = ProxyClient::new(proxy_url).unwrap();

    let err = client
        .view_document("missing.pdf", &options(3, 5_000))
        .await
        .unwrap_err();

    match err {
        ViewError::Proxy { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("404"), "unexpected message: {}", message);
        }
        other => panic!("expected proxy error, got {:?}", other),
    }

    let [view, _, storage] = candidate_paths("missing.pdf");
    assert_eq!(backend.hits(&view), 3);
    assert_eq!(backend.hits(&storage), 3);
}

/// Zero attempts still makes one request.
#[actix_rt::test]
async fn test_zero_attempts_means_one() {
    let backend = MockBackend::start().await;
    let proxy_url = spawn_proxy(&backend.base_url);
    let client = ProxyClient::new(proxy_url).unwrap();

    assert!(
        client
            .view_document("missing.pdf", &options(0, 5_000))
            .await
            .is_err()
    );

    let [view, _, _] = candidate_paths("missing.pdf");
    assert_eq!(backend.hits(&view), 1);
}

/// A hung backend is cut off by the per-attempt timeout.
#[actix_rt::test]
async fn test_attempt_timeout() {
    let backend = MockBackend::start().await;
    let [view, _, _] = candidate_paths("slow.pdf");
    backend.reply(
        &view,
        MockReply::ok("application/pdf", b"%PDF").delayed(Duration::from_secs(3)),
    );
    let proxy_url = spawn_proxy(&backend.base_url);
    let client = ProxyClient::new(proxy_url).unwrap();

    let err = client
        .view_document("slow.pdf", &options(1, 200))
        .await
        .unwrap_err();

    assert!(matches!(err, ViewError::Timeout(_)));
    assert_eq!(err.to_string(), "Request timed out after 200ms");
}

/// Success returns the proxied bytes and type.
#[actix_rt::test]
async fn test_client_returns_document() {
    let backend = MockBackend::start().await;
    let [_, download, _] = candidate_paths("agenda.pdf");
    backend.reply(&download, MockReply::ok("application/pdf", b"%PDF-agenda"));
    let proxy_url = spawn_proxy(&backend.base_url);
    let client = ProxyClient::new(proxy_url).unwrap();

    let document = client
        .view_document("agenda.pdf", &ViewOptions::default())
        .await
        .unwrap();

    assert_eq!(document.content_type, "application/pdf");
    assert_eq!(document.bytes.as_ref(), b"%PDF-agenda");
}
