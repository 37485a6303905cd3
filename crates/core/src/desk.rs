use crate::busy::{BusyCounter, BusyGuard};
use crate::notify::{Notification, Notifier, Severity};
use std::sync::Arc;

/// Shared front-desk surface: the notification banner and the loading indicator.
///
/// Cloning is cheap; clones share the same notifier and busy count.
#[derive(Clone)]
pub struct Desk {
    notifier: Arc<dyn Notifier>,
    busy: BusyCounter,
}

impl Desk {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            busy: BusyCounter::new(),
        }
    }

    pub fn busy(&self) -> &BusyCounter {
        &self.busy
    }

    pub fn begin_busy(&self) -> BusyGuard {
        self.busy.begin()
    }

    pub fn notify(&self, severity: Severity, message: impl Into<String>) {
        self.notifier.notify(Notification {
            severity,
            message: message.into(),
        });
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(Severity::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(Severity::Error, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.notify(Severity::Warning, message);
    }
}
