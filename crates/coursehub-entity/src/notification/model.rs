//! Notification entity model.
//!
//! Persisted rows only; delivery mechanics are out of scope. Rows are
//! written when an access request is resolved so the requester can read
//! the outcome even when not connected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    /// An access request was approved.
    RequestApproved,
    /// An access request was declined.
    RequestDeclined,
}

impl NotificationCategory {
    /// Return the category as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequestApproved => "request_approved",
            Self::RequestDeclined => "request_declined",
        }
    }
}

/// A per-user notification row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// The recipient.
    pub user_id: Uuid,
    /// What this notification is about.
    pub category: NotificationCategory,
    /// Short title.
    pub title: String,
    /// Body text.
    pub body: String,
    /// The related course, when applicable.
    pub course_id: Option<Uuid>,
    /// Whether the recipient has read it.
    pub is_read: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Build an unsaved notification for a resolved access request.
    pub fn for_request_resolution(
        user_id: Uuid,
        course_id: Uuid,
        category: NotificationCategory,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            category,
            title: title.into(),
            body: body.into(),
            course_id: Some(course_id),
            is_read: false,
            created_at: Utc::now(),
        }
    }
}
