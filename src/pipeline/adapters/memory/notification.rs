//! Notification sink that records every toast in memory.

use std::sync::{Arc, Mutex, PoisonError};

use crate::pipeline::ports::{Notification, NotificationLevel, NotificationSink};

/// Collects notifications for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotificationSink {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotificationSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every notification emitted so far, oldest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns how many notifications of `level` were emitted.
    #[must_use]
    pub fn count(&self, level: NotificationLevel) -> usize {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|notification| notification.level == level)
            .count()
    }
}

impl NotificationSink for RecordingNotificationSink {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
