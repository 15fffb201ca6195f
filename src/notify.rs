use parking_lot::Mutex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Non-blocking, user-visible outcome of an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Presentation sink for notices (toasts in a browser, command output for
/// the CLI)
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Collects notices until the caller drains them
#[derive(Debug, Default)]
pub struct NoticeBuffer {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock())
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices.lock().last().cloned()
    }
}

impl Notifier for NoticeBuffer {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => tracing::info!(message = %notice.message, "notice"),
            NoticeLevel::Error => tracing::warn!(message = %notice.message, "notice"),
        }
        self.notices.lock().push(notice);
    }
}
