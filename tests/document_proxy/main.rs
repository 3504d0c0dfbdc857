//! Document proxy E2E test suite.
//!
//! Runs the proxy against an in-process mock content backend.
//!
//! Run with: cargo test --test document_proxy

mod mock_backend;

mod test_preflight;
mod test_proxy_client;
