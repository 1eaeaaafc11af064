use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::lock;
use crate::models::{Notification, NotificationId, Severity};
use crate::view::{NotificationPhase, View};

/// Delay before a new notification slides in.
pub const ENTER_DELAY: Duration = Duration::from_millis(100);
/// Length of the exit transition before the notification is removed.
pub const LEAVE_TRANSITION: Duration = Duration::from_millis(300);

type Pending = Arc<Mutex<HashMap<NotificationId, JoinHandle<()>>>>;

/// Transient toasts, each with its own lifecycle task.
///
/// Every `show` is honored; there is no deduplication, ordering or rate
/// limiting. Must be used from within a tokio runtime.
pub struct NotificationQueue {
    view: Arc<dyn View>,
    timeout: Duration,
    next_id: AtomicU64,
    pending: Pending,
}

impl NotificationQueue {
    pub fn new(view: Arc<dyn View>, timeout: Duration) -> Self {
        Self {
            view,
            timeout,
            next_id: AtomicU64::new(1),
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn show(&self, message: impl Into<String>, severity: Severity) -> NotificationId {
        let notification = Notification {
            id: NotificationId(self.next_id.fetch_add(1, Ordering::Relaxed)),
            message: message.into(),
            severity,
            created_at: Utc::now(),
        };
        let id = notification.id;

        let label = severity.label();
        match severity {
            Severity::Error => tracing::warn!(severity = label, "{}", notification.message),
            _ => tracing::info!(severity = label, "{}", notification.message),
        }
        self.view.insert_notification(&notification);

        // Register under the lock so the task cannot finish before its handle is stored.
        let mut pending = lock(&self.pending);
        let handle = tokio::spawn(lifecycle(
            Arc::clone(&self.view),
            Arc::clone(&self.pending),
            id,
            self.timeout,
        ));
        pending.insert(id, handle);

        id
    }

    pub fn info(&self, message: impl Into<String>) -> NotificationId {
        self.show(message, Severity::Info)
    }

    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.show(message, Severity::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.show(message, Severity::Error)
    }

    /// Close a notification now, cancelling its auto-dismiss.
    ///
    /// Returns false if it was already gone.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let Some(handle) = lock(&self.pending).remove(&id) else {
            tracing::debug!("Notification {} already removed", id);
            return false;
        };
        handle.abort();
        self.view.set_notification_phase(id, NotificationPhase::Leaving);
        self.view.remove_notification(id);
        true
    }

    /// Notifications that have not been removed yet.
    pub fn active(&self) -> Vec<NotificationId> {
        let mut ids: Vec<_> = lock(&self.pending).keys().copied().collect();
        ids.sort();
        ids
    }
}

fn is_pending(pending: &Pending, id: NotificationId) -> bool {
    lock(pending).contains_key(&id)
}

/// Whoever takes the entry out of `pending` performs the removal.
fn take_pending(pending: &Pending, id: NotificationId) -> bool {
    lock(pending).remove(&id).is_some()
}

async fn lifecycle(view: Arc<dyn View>, pending: Pending, id: NotificationId, timeout: Duration) {
    tokio::time::sleep(ENTER_DELAY).await;
    if !is_pending(&pending, id) {
        return;
    }
    view.set_notification_phase(id, NotificationPhase::Visible);

    tokio::time::sleep(timeout.saturating_sub(ENTER_DELAY)).await;
    if !is_pending(&pending, id) {
        return;
    }
    view.set_notification_phase(id, NotificationPhase::Leaving);

    tokio::time::sleep(LEAVE_TRANSITION).await;
    if take_pending(&pending, id) {
        view.remove_notification(id);
    }
}
