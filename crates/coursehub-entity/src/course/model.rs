//! Course and lecture entity models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::price::price_is_free;

/// A published or draft course owned by an instructor.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    /// Unique course identifier.
    pub id: Uuid,
    /// Course title.
    pub title: String,
    /// Optional long description.
    pub description: Option<String>,
    /// Owning instructor.
    pub instructor_id: Uuid,
    /// Price evidence as entered by the instructor (None = free).
    pub price: Option<String>,
    /// Whether the course is visible to students.
    pub is_published: bool,
    /// When the course was created.
    pub created_at: DateTime<Utc>,
    /// Last course update.
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Whether the course is free per the price-evidence rules.
    pub fn is_free(&self) -> bool {
        price_is_free(self.price.as_deref())
    }
}

/// One video lecture within a course.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lecture {
    /// Unique lecture identifier.
    pub id: Uuid,
    /// Owning course.
    pub course_id: Uuid,
    /// Lecture title.
    pub title: String,
    /// Opaque video reference (delivery is out of scope).
    pub video_ref: String,
    /// Viewable without course access.
    pub preview_free: bool,
    /// Order index, unique per course; defines display and progress sequence.
    pub position: i32,
    /// When the lecture was created.
    pub created_at: DateTime<Utc>,
}
