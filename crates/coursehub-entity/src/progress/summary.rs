//! Derived course progress summary.
//!
//! Percentage is never stored; it is recomputed from the viewed set and
//! the course's *live* lecture count, so adding or removing lectures
//! changes it without any progress-row writes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Derived aggregate over a user's lecture progress for one course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseProgressSummary {
    /// Lectures currently viewed (restricted to lectures that still exist).
    pub viewed_lecture_ids: Vec<Uuid>,
    /// Number of viewed lectures.
    pub viewed_count: u64,
    /// Live lecture count of the course.
    pub total_lectures: u64,
    /// floor(100 * viewed / total); 0 for a course with no lectures.
    pub percentage: u8,
    /// The explicit completed override (independent of percentage).
    pub completed: bool,
}

impl CourseProgressSummary {
    /// Build a summary from the viewed set, the live total, and the
    /// stored override.
    pub fn new(viewed_lecture_ids: Vec<Uuid>, total_lectures: u64, completed: bool) -> Self {
        let viewed_count = viewed_lecture_ids.len() as u64;
        Self {
            viewed_lecture_ids,
            viewed_count,
            total_lectures,
            percentage: percentage(viewed_count, total_lectures),
            completed,
        }
    }
}

/// floor(100 * viewed / total), with a zero-lecture guard.
pub fn percentage(viewed: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    // viewed is capped at total; a dangling row that slipped past the
    // live-lecture filter must not push past 100.
    let viewed = viewed.min(total);
    (viewed * 100 / total) as u8
}
