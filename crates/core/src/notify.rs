//! User notifications.
//!
//! Save results, search warnings and failures are surfaced as short banners. The core only
//! emits them through [`Notifier`]; the CLI logs them and tests collect them.

use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Success | Severity::Info => tracing::info!("{}", notification.message),
            Severity::Warning => tracing::warn!("{}", notification.message),
            Severity::Error => tracing::error!("{}", notification.message),
        }
    }
}

/// Keeps every notification in order of arrival.
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: Mutex<Vec<Notification>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .last()
            .cloned()
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Desk;
    use std::sync::Arc;

    #[test]
    fn desk_forwards_notifications_in_order() {
        let log = Arc::new(NotificationLog::new());
        let desk = Desk::new(log.clone());

        desk.success("Patient profile added");
        desk.warning("No results found");

        let severities: Vec<_> = log.entries().into_iter().map(|n| n.severity).collect();
        assert_eq!(severities, vec![Severity::Success, Severity::Warning]);
        assert_eq!(
            log.last().map(|n| n.message),
            Some("No results found".to_string())
        );
    }
}
