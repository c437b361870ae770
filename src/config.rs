//! Application configuration constants
//!
//! Central location for storage keys, countdown timing and retention
//! limits. Services receive these as explicit config structs rather than
//! reading module-level state.

use std::time::Duration;

// ===== Storage Keys =====

/// Storage key for the persisted shopping list.
pub const SHOPPING_LIST_STORAGE_KEY: &str = "shopping-list";

/// Storage key for the persisted countdown state.
pub const COUNTDOWN_STORAGE_KEY: &str = "taskly-countdown";

// ===== Countdown Timing =====

/// How long after a completion the thing becomes due again.
pub const COUNTDOWN_INTERVAL: Duration = Duration::from_secs(10);

/// Period of the countdown status recomputation loop.
pub const TICK_PERIOD: Duration = Duration::from_millis(1000);

/// Title of the notification scheduled for the next due instant.
pub const NOTIFICATION_TITLE: &str = "The Thing is Due!";

// ===== Retention Limits =====

/// Maximum number of completion timestamps retained in the countdown
/// history. Oldest entries are dropped past this point.
pub const HISTORY_RETENTION_LIMIT: usize = 1000;

/// Configuration for the countdown service.
#[derive(Debug, Clone)]
pub struct CountdownConfig {
    pub storage_key: String,
    pub interval: Duration,
    pub notification_title: String,
    pub history_limit: usize,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            storage_key: COUNTDOWN_STORAGE_KEY.to_string(),
            interval: COUNTDOWN_INTERVAL,
            notification_title: NOTIFICATION_TITLE.to_string(),
            history_limit: HISTORY_RETENTION_LIMIT,
        }
    }
}

/// Configuration for the shopping list service.
#[derive(Debug, Clone)]
pub struct ShoppingListConfig {
    pub storage_key: String,
}

impl Default for ShoppingListConfig {
    fn default() -> Self {
        Self {
            storage_key: SHOPPING_LIST_STORAGE_KEY.to_string(),
        }
    }
}
