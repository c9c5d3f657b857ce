//! Notification side-channel.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
    Success,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            created_at: Utc::now(),
        }
    }
}

/// Anything that can surface a notification to the operator.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);

    fn error(&self, message: String) {
        self.notify(Notification::new(NotificationLevel::Error, message));
    }

    fn success(&self, message: String) {
        self.notify(Notification::new(NotificationLevel::Success, message));
    }
}

/// Shared, append-only notification log. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    entries: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<Notification> {
        self.lock().last().cloned()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl NotificationSink for NotificationLog {
    fn notify(&self, notification: Notification) {
        self.lock().push(notification);
    }
}
