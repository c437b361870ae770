//! Integration tests for the Taskly core
//!
//! These tests verify end-to-end functionality including:
//! - Application wiring against an on-disk database
//! - Shopping list operations surviving a restart
//! - The countdown completion transition and its notification lifecycle

use std::time::Duration;
use taskly::app::AppState;
use taskly::config::{CountdownConfig, ShoppingListConfig};
use taskly::database::{create_pool, KvStore};
use taskly::services::{
    CountdownService, NotificationService, PermissionState, ShoppingListService,
};
use tempfile::TempDir;

#[tokio::test]
async fn test_app_state_wires_all_services() {
    let temp_dir = TempDir::new().unwrap();

    let app = AppState::init(temp_dir.path()).await.unwrap();

    let list = app.shopping_list.list().await.unwrap();
    assert!(list.is_empty());

    let status = app.countdown.status().await.unwrap();
    assert!(!status.is_overdue);

    assert_eq!(
        app.notifications.request_permission(),
        PermissionState::Granted
    );
}

#[tokio::test]
async fn test_shopping_list_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("taskly.db");

    {
        let pool = create_pool(&db_path).await.unwrap();
        let service =
            ShoppingListService::new(KvStore::new(pool), ShoppingListConfig::default());

        service.add("Milk").await.unwrap();
        let list = service.add("Eggs").await.unwrap();
        service.toggle_complete(&list[1].id).await.unwrap();
    }

    // Reopen the database as a fresh process would.
    let pool = create_pool(&db_path).await.unwrap();
    let service = ShoppingListService::new(KvStore::new(pool), ShoppingListConfig::default());

    let list = service.list().await.unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].name, "Eggs");
    assert!(!list[0].is_completed());
    assert_eq!(list[1].name, "Milk");
    assert!(list[1].is_completed());
}

#[tokio::test]
async fn test_countdown_state_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("taskly.db");

    let config = CountdownConfig {
        interval: Duration::from_secs(60),
        ..CountdownConfig::default()
    };

    {
        let pool = create_pool(&db_path).await.unwrap();
        let service = CountdownService::new(
            KvStore::new(pool),
            NotificationService::new(),
            config.clone(),
        );

        service.complete().await.unwrap();
        service.complete().await.unwrap();
    }

    let pool = create_pool(&db_path).await.unwrap();
    let service = CountdownService::new(KvStore::new(pool), NotificationService::new(), config);

    let history = service.history().await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[0] >= history[1]);

    // Freshly completed a minute-long interval ago at most, so not overdue.
    let status = service.status().await.unwrap();
    assert!(!status.is_overdue);
}

#[tokio::test]
async fn test_completion_reschedules_notification() {
    let temp_dir = TempDir::new().unwrap();
    let pool = create_pool(&temp_dir.path().join("taskly.db")).await.unwrap();

    let notifications = NotificationService::new();
    let service = CountdownService::new(
        KvStore::new(pool),
        notifications.clone(),
        CountdownConfig {
            interval: Duration::from_millis(50),
            ..CountdownConfig::default()
        },
    );

    let mut fired = notifications.subscribe();

    let receipt = service.complete().await.unwrap();
    assert!(receipt.notification_scheduled);

    // The scheduled notification fires once the interval elapses.
    let notification = fired.recv().await.unwrap();
    assert_eq!(notification.title, "The Thing is Due!");

    let state = service.load_state().await.unwrap().unwrap();
    assert_eq!(state.current_notification_id, Some(notification.id));
}

#[tokio::test]
async fn test_denied_permission_keeps_countdown_working() {
    let temp_dir = TempDir::new().unwrap();
    let pool = create_pool(&temp_dir.path().join("taskly.db")).await.unwrap();

    let service = CountdownService::new(
        KvStore::new(pool),
        NotificationService::with_permission(PermissionState::Denied),
        CountdownConfig::default(),
    );

    let receipt = service.complete().await.unwrap();
    assert!(!receipt.notification_scheduled);

    let state = service.load_state().await.unwrap().unwrap();
    assert!(state.current_notification_id.is_none());
    assert_eq!(state.completed_at_timestamps.len(), 1);
}

#[tokio::test]
async fn test_ticker_drives_status_updates() {
    let temp_dir = TempDir::new().unwrap();
    let app = AppState::init(temp_dir.path()).await.unwrap();

    let mut rx = app.countdown.subscribe();
    let _guard = app.countdown.start_ticker();

    rx.changed().await.unwrap();
    let status = *rx.borrow_and_update();

    // Nothing completed yet: due instant is "now", nothing overdue.
    assert!(!status.is_overdue);
}
