//! Channel naming conventions.
//!
//! Two channel families exist: one per (user, course) pair for access
//! decision invalidation, and one per user for notifications and
//! request resolutions.

use uuid::Uuid;

/// Channel carrying access-decision changes for one (user, course) pair.
pub fn access_channel(user_id: Uuid, course_id: Uuid) -> String {
    format!("access:{user_id}:{course_id}")
}

/// Channel carrying per-user events (notifications, request outcomes).
pub fn user_channel(user_id: Uuid) -> String {
    format!("user:{user_id}")
}
