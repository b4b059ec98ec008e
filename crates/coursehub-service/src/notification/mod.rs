//! Notification creation and reads.

pub mod service;

pub use service::NotificationService;
