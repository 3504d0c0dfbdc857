//! What the view dialog shows for a given state.
//!
//! Only `application/pdf` is rendered inline. Every other type gets the
//! "open externally" affordance. There is no content sniffing.

use super::ViewStatus;
use crate::models::{DocumentRef, PDF_MIME_TYPE};

/// Body of the view dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewBody {
    /// Dialog closed.
    Hidden,
    Loading,
    Error {
        message: String,
        can_retry: bool,
        /// Original source URL, opened in a new browsing context.
        external_url: Option<String>,
    },
    /// Embedded viewer with a manual open link inside it in case the host
    /// cannot render inline.
    InlineViewer {
        object_url: String,
        mime_type: &'static str,
        fallback_url: String,
    },
    ExternalOnly {
        url: String,
    },
}

/// Dialog header plus body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub title: String,
    pub description: Option<String>,
    pub body: ViewBody,
}

/// Apply the rendering policy.
pub fn plan(document: Option<&DocumentRef>, status: &ViewStatus) -> ViewModel {
    let (title, description) = document
        .map(|d| (d.title.clone(), d.description.clone()))
        .unwrap_or_default();

    let body = match status {
        ViewStatus::Idle => ViewBody::Hidden,
        ViewStatus::Loading => ViewBody::Loading,
        ViewStatus::Error(message) => ViewBody::Error {
            message: message.clone(),
            can_retry: document.is_some(),
            external_url: document
                .map(|d| d.file_url.clone())
                .filter(|url| !url.is_empty()),
        },
        ViewStatus::Ready { url, .. } => {
            if document.is_some_and(DocumentRef::is_pdf) {
                ViewBody::InlineViewer {
                    object_url: url.clone(),
                    mime_type: PDF_MIME_TYPE,
                    fallback_url: url.clone(),
                }
            } else {
                ViewBody::ExternalOnly { url: url.clone() }
            }
        }
    };

    ViewModel {
        title,
        description,
        body,
    }
}
