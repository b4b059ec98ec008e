//! Notification entity.

pub mod model;

pub use model::{Notification, NotificationCategory};
