//! Toast notifications. Each toast schedules its own dismissal; the queue
//! itself is append-only and uncapped.

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

pub const DEFAULT_DISMISS_AFTER: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
    Warning,
}

impl ToastKind {
    pub fn icon(self) -> &'static str {
        match self {
            ToastKind::Success => "✓",
            ToastKind::Error => "✗",
            ToastKind::Info => "ℹ",
            ToastKind::Warning => "⚠",
        }
    }

    pub fn default_title(self) -> &'static str {
        match self {
            ToastKind::Success => "✓ Success",
            ToastKind::Error => "✗ Error",
            ToastKind::Info => "ℹ Information",
            ToastKind::Warning => "⚠ Warning",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Info => "info",
            ToastKind::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Default)]
struct ToastQueueState {
    next_id: u64,
    toasts: Vec<Toast>,
}

/// Shared handle; clones see the same queue.
#[derive(Clone)]
pub struct ToastQueue {
    inner: Arc<Mutex<ToastQueueState>>,
    dismiss_after: Duration,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(DEFAULT_DISMISS_AFTER)
    }
}

impl ToastQueue {
    pub fn new(dismiss_after: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ToastQueueState::default())),
            dismiss_after,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ToastQueueState> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, kind: ToastKind, title: Option<&str>, message: impl Into<String>) -> ToastId {
        let message = message.into();
        let title = title.unwrap_or(kind.default_title()).to_string();
        let id = {
            let mut guard = self.lock();
            guard.next_id += 1;
            let id = ToastId(guard.next_id);
            guard.toasts.push(Toast {
                id,
                kind,
                title: title.clone(),
                message: message.clone(),
                created_at: Utc::now(),
            });
            id
        };
        info!(toast_id = id.0, kind = kind.as_str(), %title, %message, "toast");
        self.schedule_dismiss(id);
        id
    }

    fn schedule_dismiss(&self, id: ToastId) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(toast_id = id.0, "no async runtime; toast stays until dismissed");
            return;
        };
        let queue = self.clone();
        let delay = self.dismiss_after;
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if queue.dismiss(id) {
                debug!(toast_id = id.0, "toast expired");
            }
        });
    }

    /// Returns false when the toast was already gone.
    pub fn dismiss(&self, id: ToastId) -> bool {
        let mut guard = self.lock();
        let before = guard.toasts.len();
        guard.toasts.retain(|toast| toast.id != id);
        guard.toasts.len() != before
    }

    pub fn active(&self) -> Vec<Toast> {
        self.lock().toasts.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().toasts.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/notifications_tests.rs"]
mod tests;
