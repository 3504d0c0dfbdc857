//! Business logic services.

pub mod document_fetcher;

pub use document_fetcher::{Candidate, DocumentFetcher, FetchError, UpstreamDocument};
