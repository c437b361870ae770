//! Services module
//!
//! Business logic services the presentation layer drives directly.

pub mod countdown;
pub mod notifications;
pub mod shopping_list;

pub use countdown::{
    compute_status, format_completed_at, CompletionReceipt, CountdownService, CountdownStatus,
    Distance, TickerGuard,
};
pub use notifications::{FiredNotification, NotificationService, PermissionState};
pub use shopping_list::{order_items, ShoppingListService};
