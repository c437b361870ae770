//! Application state and initialization
//!
//! Wires the store and the domain services together. The presentation
//! layer holds an AppState and reaches everything through it.

use crate::config::{CountdownConfig, ShoppingListConfig};
use crate::database::{create_pool, KvStore};
use crate::error::Result;
use crate::services::{CountdownService, NotificationService, ShoppingListService};
use std::path::Path;

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub notifications: NotificationService,
    pub countdown: CountdownService,
    pub shopping_list: ShoppingListService,
}

impl AppState {
    /// Initialize all services against the given data directory.
    pub async fn init(app_data_dir: &Path) -> Result<Self> {
        tracing::info!("Initializing application core at {:?}", app_data_dir);

        std::fs::create_dir_all(app_data_dir)?;

        let pool = create_pool(&app_data_dir.join("taskly.db")).await?;
        let store = KvStore::new(pool);

        let notifications = NotificationService::new();
        let countdown = CountdownService::new(
            store.clone(),
            notifications.clone(),
            CountdownConfig::default(),
        );
        let shopping_list = ShoppingListService::new(store, ShoppingListConfig::default());

        tracing::info!("Application core initialized");

        Ok(Self {
            notifications,
            countdown,
            shopping_list,
        })
    }
}
