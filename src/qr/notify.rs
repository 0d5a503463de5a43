use std::sync::Mutex;

use super::types::Notification;
use crate::models::enums::Severity;

/// Receives scan notifications (a toast layer, a log, a test recorder).
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Sink that writes notifications to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, n: &Notification) {
        match n.severity {
            Severity::Normal => tracing::info!(title = %n.title, "{}", n.description),
            Severity::Caution => tracing::warn!(title = %n.title, "{}", n.description),
            Severity::Destructive => tracing::error!(title = %n.title, "{}", n.description),
        }
    }
}

/// Sink that keeps every notification in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    received: Mutex<Vec<Notification>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain everything received so far.
    pub fn take(&self) -> Vec<Notification> {
        self.received
            .lock()
            .map(|mut v| std::mem::take(&mut *v))
            .unwrap_or_default()
    }
}

impl NotificationSink for CollectingSink {
    fn notify(&self, notification: &Notification) {
        if let Ok(mut received) = self.received.lock() {
            received.push(notification.clone());
        }
    }
}

impl<S: NotificationSink + ?Sized> NotificationSink for std::sync::Arc<S> {
    fn notify(&self, notification: &Notification) {
        (**self).notify(notification)
    }
}
