//! Stored progress rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Per-user, per-lecture viewed state. One row per (user, course,
/// lecture); created lazily on first interaction and upserted thereafter.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LectureProgress {
    /// The viewing user.
    pub user_id: Uuid,
    /// The course the lecture belongs to.
    pub course_id: Uuid,
    /// The lecture.
    pub lecture_id: Uuid,
    /// Whether the lecture has been viewed.
    pub viewed: bool,
    /// Last write; used for monotonic tie-breaking under concurrent
    /// updates (a stale write never overrides a newer one).
    pub updated_at: DateTime<Utc>,
}

/// The explicit per-course completed override. Stored separately from
/// lecture rows so lecture-level updates never recompute it away.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseCompletion {
    /// The user.
    pub user_id: Uuid,
    /// The course.
    pub course_id: Uuid,
    /// The explicit override value.
    pub completed: bool,
    /// Last override change.
    pub updated_at: DateTime<Utc>,
}
