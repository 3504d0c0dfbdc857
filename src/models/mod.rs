//! Domain models for docdesk.

pub mod document;

// Re-export commonly used types
pub use document::{DocumentRef, ProxyErrorBody, PDF_MIME_TYPE};
