//! Notification service
//!
//! In-process stand-in for the platform notification API: schedules
//! one-shot notifications on the tokio runtime and cancels them by their
//! opaque id. Fired notifications are published on a broadcast channel
//! for the presentation layer to observe. Permission prompting is a
//! platform concern; the host injects the outcome at construction.

use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Outcome of a notification permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
}

/// A notification that reached its trigger time
#[derive(Debug, Clone, serde::Serialize)]
pub struct FiredNotification {
    pub id: String,
    pub title: String,
    pub fired_at: DateTime<Utc>,
}

/// Notification service with an in-process timer per scheduled notification
#[derive(Clone)]
pub struct NotificationService {
    permission: PermissionState,
    pending: Arc<Mutex<HashMap<String, JoinHandle<()>>>>,
    fired_tx: broadcast::Sender<FiredNotification>,
}

impl NotificationService {
    pub fn new() -> Self {
        Self::with_permission(PermissionState::Granted)
    }

    /// Create a service with a fixed permission outcome.
    pub fn with_permission(permission: PermissionState) -> Self {
        let (fired_tx, _) = broadcast::channel(16);

        Self {
            permission,
            pending: Arc::new(Mutex::new(HashMap::new())),
            fired_tx,
        }
    }

    /// Report the permission state the host configured.
    pub fn request_permission(&self) -> PermissionState {
        self.permission
    }

    /// Schedule a one-shot notification firing after `delay`.
    ///
    /// Returns the opaque id to use for later cancellation.
    pub async fn schedule_one_shot(&self, delay: Duration, title: &str) -> Result<String> {
        if self.permission == PermissionState::Denied {
            return Err(AppError::PermissionDenied);
        }

        let id = Uuid::new_v4().to_string();
        let task_id = id.clone();
        let task_title = title.to_string();
        let pending = Arc::clone(&self.pending);
        let fired_tx = self.fired_tx.clone();

        // Hold the registry lock across the spawn so the timer task cannot
        // observe the map before its own entry is inserted.
        let mut registry = self.pending.lock().await;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            pending.lock().await.remove(&task_id);

            tracing::info!("Notification fired: {} ({})", task_title, task_id);

            let _ = fired_tx.send(FiredNotification {
                id: task_id,
                title: task_title,
                fired_at: Utc::now(),
            });
        });

        registry.insert(id.clone(), handle);

        tracing::debug!("Scheduled notification {} in {:?}", id, delay);
        Ok(id)
    }

    /// Cancel a scheduled notification. Unknown ids are ignored.
    pub async fn cancel(&self, id: &str) -> Result<()> {
        if let Some(handle) = self.pending.lock().await.remove(id) {
            handle.abort();
            tracing::debug!("Cancelled notification {}", id);
        }

        Ok(())
    }

    /// Subscribe to notifications as they fire.
    pub fn subscribe(&self) -> broadcast::Receiver<FiredNotification> {
        self.fired_tx.subscribe()
    }

    /// Number of notifications currently scheduled and not yet fired.
    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new()
    }
}
