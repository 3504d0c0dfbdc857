//! Transient user-visible notifications.

use tracing::warn;

/// Presentation style of a toast. Only failures are raised today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationVariant {
    Destructive,
}

/// A toast shown to the user without blocking the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub variant: NotificationVariant,
    pub title: String,
    pub description: String,
}

impl Notification {
    /// Shown whenever loading a document fails.
    pub fn load_failed() -> Self {
        Self {
            variant: NotificationVariant::Destructive,
            title: "Error loading document".to_string(),
            description: "Please try again or open in a new tab.".to_string(),
        }
    }
}

/// Receives notifications raised by the controller.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.variant {
            NotificationVariant::Destructive => warn!(
                target: "notify",
                "{}: {}",
                notification.title,
                notification.description
            ),
        }
    }
}
