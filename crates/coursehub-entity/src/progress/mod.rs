//! Lecture progress entities and derived course summary.

pub mod model;
pub mod summary;

pub use model::{CourseCompletion, LectureProgress};
pub use summary::CourseProgressSummary;
