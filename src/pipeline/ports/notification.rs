//! Notification sink port for user-facing toasts.

use serde::Serialize;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    /// Operation completed.
    Success,
    /// Operation failed.
    Error,
}

/// Short human-readable toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Headline, such as `"Success"` or `"Error"`.
    pub title: String,
    /// One-line summary.
    pub description: String,
}

impl Notification {
    /// Creates a success notification.
    #[must_use]
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: "Success".to_owned(),
            description: description.into(),
        }
    }

    /// Creates an error notification.
    #[must_use]
    pub fn error(description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: "Error".to_owned(),
            description: description.into(),
        }
    }
}

/// Fire-and-forget toast output.
pub trait NotificationSink: Send + Sync {
    /// Emits a notification. Delivery is never awaited.
    fn notify(&self, notification: Notification);
}
