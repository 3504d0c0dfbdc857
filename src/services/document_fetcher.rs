//! Multi-endpoint document retrieval from the content backend.
//!
//! The backend serves the same logical file from several places depending on
//! how it was uploaded. Candidates are tried strictly in order and the first
//! 2xx response wins.

use actix_web::web::Bytes;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{debug, error, warn};

use crate::config::BackendSettings;
use crate::models::PDF_MIME_TYPE;

/// Accept header sent to every candidate.
pub const UPSTREAM_ACCEPT: &str = "application/pdf,application/octet-stream,*/*";

/// Backend locations that may serve a document, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    View,
    Download,
    Storage,
}

impl Candidate {
    pub const ORDER: [Candidate; 3] = [Candidate::View, Candidate::Download, Candidate::Storage];

    /// Build the candidate URL for a file name.
    pub fn url(self, base_url: &str, file_name: &str) -> String {
        let encoded = urlencoding::encode(file_name);
        match self {
            Candidate::View => format!("{}/api/documents/view/{}", base_url, encoded),
            Candidate::Download => format!("{}/api/documents/download/{}", base_url, encoded),
            Candidate::Storage => format!("{}/storage/documents/{}", base_url, encoded),
        }
    }
}

/// Lazily produce candidate URLs in priority order.
pub fn candidate_urls<'a>(
    base_url: &'a str,
    file_name: &'a str,
) -> impl Iterator<Item = String> + 'a {
    Candidate::ORDER
        .into_iter()
        .map(move |candidate| candidate.url(base_url, file_name))
}

/// A document successfully read from one candidate.
#[derive(Debug, Clone)]
pub struct UpstreamDocument {
    pub status: StatusCode,
    pub content_type: String,
    pub body: Bytes,
    pub source_url: String,
}

/// Why a candidate, or the whole chain, failed.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with {status}")]
    Rejected { url: String, status: StatusCode },

    #[error("Failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to fetch document from all endpoints")]
    Exhausted,
}

/// Result of a single candidate request.
enum AttemptOutcome {
    Success(UpstreamDocument),
    Failed(FetchError),
}

/// Fetches documents from the content backend with candidate fallback.
#[derive(Clone)]
pub struct DocumentFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl DocumentFetcher {
    /// Create a fetcher from backend settings.
    pub fn new(settings: &BackendSettings) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL candidates are built from.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Try every candidate in order and return the first success.
    ///
    /// On exhaustion the last recorded failure is returned.
    pub async fn fetch(&self, file_name: &str) -> Result<UpstreamDocument, FetchError> {
        let mut last_error = None;

        for url in candidate_urls(&self.base_url, file_name) {
            debug!("Trying endpoint: {}", url);
            match self.attempt(url).await {
                AttemptOutcome::Success(document) => {
                    debug!(
                        "Fetched {} from {} ({} bytes, {})",
                        file_name,
                        document.source_url,
                        document.body.len(),
                        document.content_type
                    );
                    return Ok(document);
                }
                AttemptOutcome::Failed(err) => {
                    warn!("Failed to fetch from endpoint: {}", err);
                    last_error = Some(err);
                }
            }
        }

        let err = last_error.unwrap_or(FetchError::Exhausted);
        error!("All endpoints failed for {}: {}", file_name, err);
        Err(err)
    }

    async fn attempt(&self, url: String) -> AttemptOutcome {
        let response = match self
            .client
            .get(&url)
            .header(ACCEPT, UPSTREAM_ACCEPT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(source) => return AttemptOutcome::Failed(FetchError::Transport { url, source }),
        };

        let status = response.status();
        if !status.is_success() {
            return AttemptOutcome::Failed(FetchError::Rejected { url, status });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .unwrap_or(PDF_MIME_TYPE)
            .to_string();

        match response.bytes().await {
            Ok(body) => AttemptOutcome::Success(UpstreamDocument {
                status,
                content_type,
                body,
                source_url: url,
            }),
            Err(source) => AttemptOutcome::Failed(FetchError::Body { url, source }),
        }
    }
}
