//! Shopping list service
//!
//! High-level operations over the persisted shopping list: add, delete,
//! toggle-complete, and the display ordering. Every mutation persists the
//! post-update list before returning it.

use crate::config::ShoppingListConfig;
use crate::database::{KvStore, ShoppingListItem};
use crate::error::Result;
use chrono::Utc;
use std::cmp::Ordering;
use uuid::Uuid;

/// Display ordering for the shopping list, as a pure projection.
///
/// Incomplete items come first, most recently updated on top; completed
/// items follow, most recently completed on top. The input is left
/// untouched.
pub fn order_items(items: &[ShoppingListItem]) -> Vec<ShoppingListItem> {
    let mut ordered = items.to_vec();

    ordered.sort_by(
        |a, b| match (a.completed_at_timestamp, b.completed_at_timestamp) {
            (Some(a_done), Some(b_done)) => b_done.cmp(&a_done),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => b.last_updated_timestamp.cmp(&a.last_updated_timestamp),
        },
    );

    ordered
}

/// Service for managing the shopping list
#[derive(Clone)]
pub struct ShoppingListService {
    store: KvStore,
    config: ShoppingListConfig,
}

impl ShoppingListService {
    pub fn new(store: KvStore, config: ShoppingListConfig) -> Self {
        Self { store, config }
    }

    /// The persisted list in display order.
    pub async fn list(&self) -> Result<Vec<ShoppingListItem>> {
        Ok(order_items(&self.load().await?))
    }

    /// Add an item to the front of the list.
    ///
    /// Blank names are rejected as a no-op; the current list is returned
    /// unchanged.
    pub async fn add(&self, name: &str) -> Result<Vec<ShoppingListItem>> {
        let name = name.trim();
        if name.is_empty() {
            tracing::debug!("Ignoring blank shopping list entry");
            return self.list().await;
        }

        let mut items = self.load().await?;

        let item = ShoppingListItem {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            completed_at_timestamp: None,
            last_updated_timestamp: Utc::now().timestamp_millis(),
        };

        tracing::info!("Adding shopping list item: {}", item.name);
        items.insert(0, item);

        self.persist(&items).await?;
        Ok(order_items(&items))
    }

    /// Delete an item. Unknown ids are a no-op.
    pub async fn remove(&self, id: &str) -> Result<Vec<ShoppingListItem>> {
        let mut items = self.load().await?;
        let before = items.len();

        items.retain(|item| item.id != id);

        if items.len() != before {
            self.persist(&items).await?;
            tracing::info!("Removed shopping list item {}", id);
        }

        Ok(order_items(&items))
    }

    /// Flip an item between active and completed, refreshing its update
    /// timestamp. Unknown ids are a no-op.
    pub async fn toggle_complete(&self, id: &str) -> Result<Vec<ShoppingListItem>> {
        let mut items = self.load().await?;
        let mut changed = false;

        for item in items.iter_mut() {
            if item.id == id {
                let now = Utc::now().timestamp_millis();

                item.completed_at_timestamp = match item.completed_at_timestamp {
                    Some(_) => None,
                    None => Some(now),
                };
                item.last_updated_timestamp = now;
                changed = true;
            }
        }

        if changed {
            self.persist(&items).await?;
        }

        Ok(order_items(&items))
    }

    async fn load(&self) -> Result<Vec<ShoppingListItem>> {
        Ok(self
            .store
            .get(&self.config.storage_key)
            .await?
            .unwrap_or_default())
    }

    async fn persist(&self, items: &[ShoppingListItem]) -> Result<()> {
        self.store.set(&self.config.storage_key, items).await
    }
}
