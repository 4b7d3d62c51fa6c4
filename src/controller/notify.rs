// Blocking user notifications.
//
// The controller raises a notice for every error it reports. How the notice
// reaches the user (alert dialog, stderr, a test recorder) is up to the
// Notifier implementation.

use std::sync::Mutex;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// A message the user must acknowledge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Technical detail for logs or an expandable section.
    pub detail: Option<String>,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Keeps every notice in memory, in order.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.notices.lock().map(|n| n.len()).unwrap_or(0)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice.clone());
        }
    }
}
