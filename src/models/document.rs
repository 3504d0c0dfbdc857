//! Document references and proxy wire types.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// MIME type rendered by the inline viewer and assumed when upstream omits one.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// A document record as served by the content API.
///
/// Only `file_url` and `file_type` drive retrieval and rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub file_url: String,
    #[serde(default)]
    pub file_type: String,
}

impl DocumentRef {
    /// Build a reference from just the fields the viewer needs.
    pub fn new(file_url: impl Into<String>, file_type: impl Into<String>) -> Self {
        Self {
            file_url: file_url.into(),
            file_type: file_type.into(),
            ..Default::default()
        }
    }

    /// Last `/`-separated segment of the source URL, if non-empty.
    ///
    /// The segment is percent-decoded so each hop encodes it exactly once.
    /// A segment that does not decode to UTF-8 is returned as is.
    pub fn file_name(&self) -> Option<Cow<'_, str>> {
        let segment = self.file_url.rsplit('/').next().filter(|s| !s.is_empty())?;
        Some(urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment)))
    }

    /// Whether the declared type selects the inline viewer.
    pub fn is_pdf(&self) -> bool {
        self.file_type == PDF_MIME_TYPE
    }
}

/// JSON body returned by the proxy when every candidate fails.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProxyErrorBody {
    pub error: String,
    pub details: String,
}
