//! Client-side document viewing.
//!
//! A [`DocumentViewController`] requests a document through the proxy,
//! wraps the bytes in a [`LocalResource`] and tracks loading, ready and
//! error state for the view dialog.

use std::time::Duration;

pub mod client;
pub mod controller;
pub mod notify;
pub mod render;
pub mod resource;

pub use client::{DocumentSource, FetchedDocument, ProxyClient, ViewOptions};
pub use controller::{DocumentViewController, ViewState, ViewStatus};
pub use notify::{Notification, NotificationVariant, Notifier, TracingNotifier};
pub use render::{ViewBody, ViewModel};
pub use resource::{LocalResource, ObjectUrlRegistry, ResourceContents};

/// Errors surfaced by the viewer.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("No document URL provided")]
    MissingUrl,

    #[error("Invalid file URL")]
    InvalidFileUrl,

    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Failed to load document: {0}")]
    Request(String),

    /// The proxy answered with a non-2xx status.
    #[error("{message}")]
    Proxy { status: u16, message: String },

    #[error("No document to retry")]
    NoDocument,

    /// A newer `open` or a `close` replaced this request before it finished.
    #[error("Superseded by a newer request")]
    Superseded,
}

impl From<reqwest::Error> for ViewError {
    fn from(err: reqwest::Error) -> Self {
        ViewError::Request(err.to_string())
    }
}
