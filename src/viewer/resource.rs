//! Revocable local handles over fetched document bytes.
//!
//! Mirrors browser object URLs: bytes are registered under a `blob:` URL
//! that stays readable until the owning [`LocalResource`] is dropped.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use actix_web::web::Bytes;
use tracing::debug;
use uuid::Uuid;

const URL_PREFIX: &str = "blob:docdesk/";

/// Bytes and MIME type behind a live resource URL.
#[derive(Debug, Clone)]
pub struct ResourceContents {
    pub bytes: Bytes,
    pub mime_type: String,
}

#[derive(Default)]
struct RegistryInner {
    entries: Mutex<HashMap<String, ResourceContents>>,
    created: AtomicUsize,
    revoked: AtomicUsize,
}

/// Registry of live resource URLs.
#[derive(Clone, Default)]
pub struct ObjectUrlRegistry {
    inner: Arc<RegistryInner>,
}

impl ObjectUrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, ResourceContents>> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Register bytes and return the handle that owns them.
    pub fn create(&self, bytes: Bytes, mime_type: impl Into<String>) -> LocalResource {
        let url = format!("{}{}", URL_PREFIX, Uuid::new_v4());
        let mime_type = mime_type.into();
        let len = bytes.len();

        self.entries().insert(
            url.clone(),
            ResourceContents {
                bytes,
                mime_type: mime_type.clone(),
            },
        );
        self.inner.created.fetch_add(1, Ordering::SeqCst);
        debug!("Created resource {} ({} bytes, {})", url, len, mime_type);

        LocalResource {
            url,
            mime_type,
            len,
            registry: self.clone(),
        }
    }

    /// Contents of a live URL; `None` once revoked.
    pub fn read(&self, url: &str) -> Option<ResourceContents> {
        self.entries().get(url).cloned()
    }

    fn revoke(&self, url: &str) {
        if self.entries().remove(url).is_some() {
            self.inner.revoked.fetch_add(1, Ordering::SeqCst);
            debug!("Revoked resource {}", url);
        }
    }

    /// Number of URLs currently readable.
    pub fn live_count(&self) -> usize {
        self.entries().len()
    }

    /// Total URLs ever created.
    pub fn created_count(&self) -> usize {
        self.inner.created.load(Ordering::SeqCst)
    }

    /// Total URLs revoked.
    pub fn revoked_count(&self) -> usize {
        self.inner.revoked.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for ObjectUrlRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectUrlRegistry")
            .field("live", &self.live_count())
            .field("created", &self.created_count())
            .field("revoked", &self.revoked_count())
            .finish()
    }
}

/// Exclusive handle over a registered resource. Revoked on drop.
pub struct LocalResource {
    url: String,
    mime_type: String,
    len: usize,
    registry: ObjectUrlRegistry,
}

impl LocalResource {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Drop for LocalResource {
    fn drop(&mut self) {
        self.registry.revoke(&self.url);
    }
}

impl fmt::Debug for LocalResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalResource")
            .field("url", &self.url)
            .field("mime_type", &self.mime_type)
            .field("len", &self.len)
            .finish()
    }
}
