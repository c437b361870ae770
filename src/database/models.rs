//! Persisted records
//!
//! Rust structs for the records stored in the key-value table.
//! All models use serde for serialization to the store and the
//! presentation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted countdown record
///
/// `completed_at_timestamps` holds epoch milliseconds, most recent first;
/// its head is the sole input to status computation.
/// `current_notification_id` refers to a notification scheduled after the
/// last completion, or is absent when none is scheduled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountdownState {
    pub current_notification_id: Option<String>,
    pub completed_at_timestamps: Vec<i64>,
}

impl CountdownState {
    /// The most recent completion instant, if any.
    pub fn last_completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at_timestamps
            .first()
            .and_then(|ms| DateTime::from_timestamp_millis(*ms))
    }
}

/// A shopping list entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub id: String,
    pub name: String,
    /// Absent while the item is active; set to the toggle instant once
    /// marked complete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at_timestamp: Option<i64>,
    /// Refreshed on every mutation (creation and toggle).
    pub last_updated_timestamp: i64,
}

impl ShoppingListItem {
    pub fn is_completed(&self) -> bool {
        self.completed_at_timestamp.is_some()
    }
}
