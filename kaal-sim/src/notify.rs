//! Fire-and-forget notification sink.

use std::sync::Arc;

use kaal_types::Mode;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::info;

/// Something the operator should be told about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum Notice {
    /// A mode transition finished; `title` is the new window title.
    ModeCommitted { mode: Mode, title: String },
    SafetyTriggered,
    SafetyReset,
}

impl Notice {
    pub fn mode_committed(mode: Mode) -> Self {
        Notice::ModeCommitted {
            mode,
            title: mode.title(),
        }
    }

    /// One-line text for status bars and logs.
    pub fn message(&self) -> String {
        match self {
            Notice::ModeCommitted { title, .. } => title.clone(),
            Notice::SafetyTriggered => "Safety protocol triggered - all systems disabled".to_string(),
            Notice::SafetyReset => "Safety protocol reset - systems ready".to_string(),
        }
    }
}

/// Receives notices. Implementations must not block.
pub trait Notifier: Send {
    fn notify(&self, notice: Notice);
}

/// Writes notices to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        info!(notice = ?notice, "{}", notice.message());
    }
}

/// Keeps every notice in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}
