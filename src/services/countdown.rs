//! Countdown service
//!
//! Owns the persisted countdown state and the Pending/Overdue status
//! computation. Completing the thing records a completion, reschedules
//! the due notification and resets the due instant forward by the
//! configured interval.

use crate::config::{CountdownConfig, TICK_PERIOD};
use crate::database::{CountdownState, KvStore};
use crate::error::Result;
use crate::services::{NotificationService, PermissionState};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

/// Non-negative time breakdown between the due instant and now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct Distance {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Distance {
    fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let total = (end - start).num_seconds().max(0);

        Self {
            days: total / 86_400,
            hours: total % 86_400 / 3_600,
            minutes: total % 3_600 / 60,
            seconds: total % 60,
        }
    }
}

/// Derived countdown status, recomputed on every tick. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct CountdownStatus {
    pub is_overdue: bool,
    pub distance: Distance,
}

/// Receipt for a completed transition.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CompletionReceipt {
    pub completed_at: DateTime<Utc>,
    /// False when notification permission was denied and the transition
    /// proceeded without scheduling.
    pub notification_scheduled: bool,
}

/// Compute the countdown status at `now`.
///
/// The due instant is the last completion plus `interval`, or `now`
/// itself when nothing has been completed yet. The breakdown always runs
/// from the earlier instant to the later one, so it is non-negative in
/// both directions.
pub fn compute_status(
    state: Option<&CountdownState>,
    interval: chrono::Duration,
    now: DateTime<Utc>,
) -> CountdownStatus {
    let due = state
        .and_then(|s| s.last_completed_at())
        .map(|completed| completed + interval)
        .unwrap_or(now);

    let is_overdue = now >= due;
    let distance = if is_overdue {
        Distance::between(due, now)
    } else {
        Distance::between(now, due)
    };

    CountdownStatus {
        is_overdue,
        distance,
    }
}

/// Render a completion instant for the history screen,
/// e.g. "Jan 5 2026, 3:04 pm".
pub fn format_completed_at(at: DateTime<Utc>) -> String {
    at.format("%b %-d %Y, %-I:%M %P").to_string()
}

/// Countdown service
#[derive(Clone)]
pub struct CountdownService {
    store: KvStore,
    notifications: NotificationService,
    config: CountdownConfig,
    status_tx: Arc<watch::Sender<CountdownStatus>>,
    // Serializes complete() transitions (double-tap guard).
    transition: Arc<Mutex<()>>,
}

impl CountdownService {
    pub fn new(
        store: KvStore,
        notifications: NotificationService,
        config: CountdownConfig,
    ) -> Self {
        let (status_tx, _) = watch::channel(CountdownStatus::default());

        Self {
            store,
            notifications,
            config,
            status_tx: Arc::new(status_tx),
            transition: Arc::new(Mutex::new(())),
        }
    }

    /// Load the persisted countdown state, absent if never completed.
    pub async fn load_state(&self) -> Result<Option<CountdownState>> {
        self.store.get(&self.config.storage_key).await
    }

    /// Current status at wall-clock now.
    pub async fn status(&self) -> Result<CountdownStatus> {
        let state = self.load_state().await?;
        Ok(compute_status(state.as_ref(), self.interval(), Utc::now()))
    }

    /// Completion instants, most recent first.
    pub async fn history(&self) -> Result<Vec<DateTime<Utc>>> {
        let state = self.load_state().await?.unwrap_or_default();

        Ok(state
            .completed_at_timestamps
            .iter()
            .filter_map(|ms| DateTime::from_timestamp_millis(*ms))
            .collect())
    }

    /// Observe status updates, published after every completion and tick.
    pub fn subscribe(&self) -> watch::Receiver<CountdownStatus> {
        self.status_tx.subscribe()
    }

    /// Mark the thing done.
    ///
    /// Schedules the next due notification (when permission allows),
    /// cancels the superseded one, prepends the completion to the history
    /// and persists the new state. The published status only advances once
    /// the state is safely stored; on a storage failure the fresh
    /// notification is cancelled again so nothing stale fires later.
    pub async fn complete(&self) -> Result<CompletionReceipt> {
        let _guard = self.transition.lock().await;

        let state = self.load_state().await?.unwrap_or_default();
        let now = Utc::now();

        let scheduled_id = match self.notifications.request_permission() {
            PermissionState::Granted => {
                match self
                    .notifications
                    .schedule_one_shot(self.config.interval, &self.config.notification_title)
                    .await
                {
                    Ok(id) => Some(id),
                    Err(e) => {
                        tracing::warn!("Failed to schedule due notification: {}", e);
                        None
                    }
                }
            }
            PermissionState::Denied => {
                tracing::warn!("Notification permission denied; completing without a reminder");
                None
            }
        };

        // The old notification targets a due instant this completion just
        // superseded; cancel it whether or not a new one was scheduled.
        if let Some(old_id) = &state.current_notification_id {
            self.notifications.cancel(old_id).await?;
        }

        let mut timestamps = Vec::with_capacity(state.completed_at_timestamps.len() + 1);
        timestamps.push(now.timestamp_millis());
        timestamps.extend_from_slice(&state.completed_at_timestamps);
        timestamps.truncate(self.config.history_limit);

        let new_state = CountdownState {
            current_notification_id: scheduled_id.clone(),
            completed_at_timestamps: timestamps,
        };

        if let Err(e) = self.store.set(&self.config.storage_key, &new_state).await {
            tracing::error!("Failed to persist countdown state: {}", e);
            if let Some(id) = &scheduled_id {
                let _ = self.notifications.cancel(id).await;
            }
            return Err(e);
        }

        self.publish(Some(&new_state), now);
        tracing::info!("Thing completed at {}", now);

        Ok(CompletionReceipt {
            completed_at: now,
            notification_scheduled: scheduled_id.is_some(),
        })
    }

    /// Spawn the 1-second status recomputation loop.
    ///
    /// The returned guard aborts the loop when dropped; hold it for as
    /// long as the countdown view is active.
    pub fn start_ticker(&self) -> TickerGuard {
        let service = self.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_PERIOD);

            loop {
                interval.tick().await;

                match service.load_state().await {
                    Ok(state) => service.publish(state.as_ref(), Utc::now()),
                    Err(e) => tracing::error!("Status tick failed: {}", e),
                }
            }
        });

        TickerGuard { handle }
    }

    fn publish(&self, state: Option<&CountdownState>, now: DateTime<Utc>) {
        self.status_tx
            .send_replace(compute_status(state, self.interval(), now));
    }

    fn interval(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.config.interval.as_millis() as i64)
    }
}

/// Aborts the status recomputation loop when dropped.
pub struct TickerGuard {
    handle: JoinHandle<()>,
}

impl Drop for TickerGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
