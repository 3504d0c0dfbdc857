//! Proxy client used by the view controller.

use std::env;
use std::time::Duration;

use actix_web::web::Bytes;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};

use super::ViewError;
use crate::config::ConfigError;
use crate::models::{PDF_MIME_TYPE, ProxyErrorBody};

/// Retry policy defaults observed in the dashboard.
pub mod defaults {
    pub const RETRY_ATTEMPTS: u32 = 3;
    pub const TIMEOUT_MS: u64 = 10_000;
    pub const RETRY_BACKOFF_MS: u64 = 500;
}

/// Bounded retry policy for one `open`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOptions {
    /// Total attempts, including the first. Zero is treated as one.
    pub retry_attempts: u32,
    /// Upper bound on each attempt.
    pub timeout: Duration,
    /// Wait before attempt `n + 1` is `retry_backoff * n`.
    pub retry_backoff: Duration,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            retry_attempts: defaults::RETRY_ATTEMPTS,
            timeout: Duration::from_millis(defaults::TIMEOUT_MS),
            retry_backoff: Duration::from_millis(defaults::RETRY_BACKOFF_MS),
        }
    }
}

impl ViewOptions {
    /// Load the policy from environment variables.
    ///
    /// - `DOCDESK_VIEW_RETRY_ATTEMPTS` (default: 3)
    /// - `DOCDESK_VIEW_TIMEOUT_MS` (default: 10000)
    /// - `DOCDESK_VIEW_RETRY_BACKOFF_MS` (default: 500)
    pub fn from_env() -> Result<Self, ConfigError> {
        let retry_attempts = env::var("DOCDESK_VIEW_RETRY_ATTEMPTS")
            .unwrap_or_else(|_| defaults::RETRY_ATTEMPTS.to_string())
            .parse::<u32>()
            .map_err(|_| {
                ConfigError::InvalidValue("DOCDESK_VIEW_RETRY_ATTEMPTS must be a valid number")
            })?;

        let timeout_ms = env::var("DOCDESK_VIEW_TIMEOUT_MS")
            .unwrap_or_else(|_| defaults::TIMEOUT_MS.to_string())
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue("DOCDESK_VIEW_TIMEOUT_MS must be a valid number")
            })?;

        let backoff_ms = env::var("DOCDESK_VIEW_RETRY_BACKOFF_MS")
            .unwrap_or_else(|_| defaults::RETRY_BACKOFF_MS.to_string())
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue("DOCDESK_VIEW_RETRY_BACKOFF_MS must be a valid number")
            })?;

        Ok(Self {
            retry_attempts,
            timeout: Duration::from_millis(timeout_ms),
            retry_backoff: Duration::from_millis(backoff_ms),
        })
    }
}

/// Bytes returned by the proxy with their reported type.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Where the controller gets document bytes from.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn view_document(
        &self,
        file_name: &str,
        options: &ViewOptions,
    ) -> Result<FetchedDocument, ViewError>;
}

/// HTTP client for the document view proxy.
#[derive(Clone)]
pub struct ProxyClient {
    client: reqwest::Client,
    base_url: String,
}

impl ProxyClient {
    /// Create a client for the proxy at `base_url` (e.g. `http://127.0.0.1:8080`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Proxy URL for a file name.
    pub fn view_url(&self, file_name: &str) -> String {
        format!(
            "{}/api/documents/view/{}",
            self.base_url,
            urlencoding::encode(file_name)
        )
    }

    async fn attempt(&self, url: &str, timeout: Duration) -> Result<FetchedDocument, ViewError> {
        tokio::time::timeout(timeout, self.request(url))
            .await
            .map_err(|_| ViewError::Timeout(timeout))?
    }

    async fn request(&self, url: &str) -> Result<FetchedDocument, ViewError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = match response.json::<ProxyErrorBody>().await {
                Ok(body) if !body.details.is_empty() => body.details,
                Ok(body) => body.error,
                Err(_) => format!("Proxy responded with {}", status),
            };
            return Err(ViewError::Proxy {
                status: status.as_u16(),
                message,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(PDF_MIME_TYPE)
            .to_string();
        let bytes = response.bytes().await?;

        Ok(FetchedDocument {
            bytes,
            content_type,
        })
    }
}

#[async_trait]
impl DocumentSource for ProxyClient {
    async fn view_document(
        &self,
        file_name: &str,
        options: &ViewOptions,
    ) -> Result<FetchedDocument, ViewError> {
        let url = self.view_url(file_name);
        let attempts = options.retry_attempts.max(1);
        let mut attempt = 1;

        loop {
            debug!("Requesting {} (attempt {}/{})", url, attempt, attempts);
            match self.attempt(&url, options.timeout).await {
                Ok(document) => return Ok(document),
                Err(err) if attempt < attempts => {
                    warn!("Attempt {} for {} failed: {}", attempt, file_name, err);
                    tokio::time::sleep(options.retry_backoff * attempt).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
