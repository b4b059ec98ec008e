//! Outbound event payloads pushed to subscribed clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events sent by the server to subscribed clients.
///
/// Every event is also observable by polling the corresponding read
/// endpoint; these messages only tell clients *when* to re-read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// The effective access decision for a (user, course) pair changed.
    AccessChanged {
        /// Affected user.
        user_id: Uuid,
        /// Affected course.
        course_id: Uuid,
        /// New decision: "granted", "pending", or "denied".
        decision: String,
        /// Human-readable reason for the decision.
        reason: String,
        /// When the change was committed.
        timestamp: DateTime<Utc>,
    },
    /// An access request reached a terminal status.
    RequestResolved {
        /// The resolved request.
        request_id: Uuid,
        /// Affected user (the requester).
        user_id: Uuid,
        /// Affected course.
        course_id: Uuid,
        /// Terminal status: "approved" or "declined".
        status: String,
        /// Decline reason, when declined.
        reason: Option<String>,
        /// When the transition was committed.
        timestamp: DateTime<Utc>,
    },
    /// A user's progress summary for a course changed.
    ProgressUpdated {
        /// Affected user.
        user_id: Uuid,
        /// Affected course.
        course_id: Uuid,
        /// Derived completion percentage (0-100).
        percentage: u8,
        /// Explicit completion override state.
        completed: bool,
        /// When the update was committed.
        timestamp: DateTime<Utc>,
    },
    /// A notification was created for the user.
    Notification {
        /// Notification ID.
        id: Uuid,
        /// Notification category.
        category: String,
        /// Notification title.
        title: String,
        /// Notification body.
        body: String,
        /// Related course, if any.
        course_id: Option<Uuid>,
        /// When the notification was created.
        timestamp: DateTime<Utc>,
    },
}
