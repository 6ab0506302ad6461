//! Notification sink that writes toasts to the tracing log.

use tracing::{info, warn};

use crate::pipeline::ports::{Notification, NotificationLevel, NotificationSink};

/// Logs notifications instead of displaying them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => {
                info!(title = %notification.title, "{}", notification.description);
            }
            NotificationLevel::Error => {
                warn!(title = %notification.title, "{}", notification.description);
            }
        }
    }
}
