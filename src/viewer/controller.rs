//! View dialog state machine.
//!
//! `idle -> loading -> (ready | error)`, with `retry` going back to
//! `loading`. Each `open` is tagged with a request token and only the latest
//! token may apply its result. The held [`LocalResource`] is released
//! whenever the state leaves `ready`, including when the controller drops.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info};

use super::client::{DocumentSource, ViewOptions};
use super::notify::{Notification, Notifier, TracingNotifier};
use super::render::{self, ViewModel};
use super::resource::{LocalResource, ObjectUrlRegistry};
use super::ViewError;
use crate::models::DocumentRef;

/// Controller-owned view state.
#[derive(Debug, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Ready(LocalResource),
    Error(String),
}

impl ViewState {
    fn status(&self) -> ViewStatus {
        match self {
            ViewState::Idle => ViewStatus::Idle,
            ViewState::Loading => ViewStatus::Loading,
            ViewState::Ready(resource) => ViewStatus::Ready {
                url: resource.url().to_string(),
                content_type: resource.mime_type().to_string(),
            },
            ViewState::Error(message) => ViewStatus::Error(message.clone()),
        }
    }
}

/// Snapshot of [`ViewState`] that does not own the resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewStatus {
    Idle,
    Loading,
    Ready { url: String, content_type: String },
    Error(String),
}

#[derive(Default)]
struct Inner {
    state: ViewState,
    document: Option<DocumentRef>,
    latest_token: u64,
    retry_count: u32,
}

/// Coordinates fetch, state and resource lifecycle for one view dialog.
pub struct DocumentViewController<S> {
    source: S,
    registry: ObjectUrlRegistry,
    notifier: Arc<dyn Notifier>,
    options: ViewOptions,
    inner: Mutex<Inner>,
}

impl<S: DocumentSource> DocumentViewController<S> {
    pub fn new(source: S, registry: ObjectUrlRegistry) -> Self {
        Self {
            source,
            registry,
            notifier: Arc::new(TracingNotifier),
            options: ViewOptions::default(),
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_options(mut self, options: ViewOptions) -> Self {
        self.options = options;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn status(&self) -> ViewStatus {
        self.lock().state.status()
    }

    pub fn document(&self) -> Option<DocumentRef> {
        self.lock().document.clone()
    }

    /// Retries requested since the dialog was last opened fresh.
    pub fn retry_count(&self) -> u32 {
        self.lock().retry_count
    }

    pub fn registry(&self) -> &ObjectUrlRegistry {
        &self.registry
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    /// Load `document` into the view.
    ///
    /// Failures land in the error state; the returned error mirrors it.
    /// Returns [`ViewError::Superseded`] if a later `open` or `close` won.
    pub async fn open(&self, document: DocumentRef) -> Result<(), ViewError> {
        let (token, file_name, attempt) = {
            let mut inner = self.lock();
            inner.latest_token += 1;
            let token = inner.latest_token;
            if inner.document.as_ref() != Some(&document) {
                inner.retry_count = 0;
            }
            inner.document = Some(document.clone());

            if document.file_url.is_empty() {
                inner.state = ViewState::Error(ViewError::MissingUrl.to_string());
                return Err(ViewError::MissingUrl);
            }

            let Some(file_name) = document.file_name() else {
                inner.state = ViewState::Error(ViewError::InvalidFileUrl.to_string());
                drop(inner);
                self.notifier.notify(Notification::load_failed());
                return Err(ViewError::InvalidFileUrl);
            };

            inner.state = ViewState::Loading;
            (token, file_name.into_owned(), inner.retry_count + 1)
        };

        info!("Loading document: {} Attempt: {}", file_name, attempt);
        let result = self.source.view_document(&file_name, &self.options).await;

        let mut inner = self.lock();
        if inner.latest_token != token {
            debug!("Discarding stale result for {} (token {})", file_name, token);
            return Err(ViewError::Superseded);
        }

        match result {
            Ok(fetched) => {
                // Release whatever is held before the replacement exists.
                drop(std::mem::replace(&mut inner.state, ViewState::Loading));
                let resource = self.registry.create(fetched.bytes, fetched.content_type);
                info!("Document loaded successfully: {}", resource.mime_type());
                inner.state = ViewState::Ready(resource);
                Ok(())
            }
            Err(err) => {
                error!("Error loading document {}: {}", file_name, err);
                inner.state = ViewState::Error(err.to_string());
                drop(inner);
                self.notifier.notify(Notification::load_failed());
                Err(err)
            }
        }
    }

    /// Re-run `open` for the current document from the first attempt.
    pub async fn retry(&self) -> Result<(), ViewError> {
        let document = {
            let mut inner = self.lock();
            let Some(document) = inner.document.clone() else {
                return Err(ViewError::NoDocument);
            };
            inner.retry_count += 1;
            document
        };

        self.open(document).await
    }

    /// Release the held resource and reset to idle.
    ///
    /// Any fetch still in flight is discarded when it completes.
    pub fn close(&self) {
        let mut inner = self.lock();
        inner.latest_token += 1;
        inner.state = ViewState::Idle;
        inner.document = None;
        inner.retry_count = 0;
    }

    pub fn render(&self) -> ViewModel {
        let inner = self.lock();
        render::plan(inner.document.as_ref(), &inner.state.status())
    }
}
