//! Course and lecture repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use coursehub_core::error::{AppError, ErrorKind};
use coursehub_core::result::AppResult;
use coursehub_core::types::pagination::{PageRequest, PageResponse};
use coursehub_entity::course::{Course, Lecture};

/// Repository for course metadata, lectures, and the enrolled-students set.
#[derive(Debug, Clone)]
pub struct CourseRepository {
    pool: PgPool,
}

impl CourseRepository {
    /// Create a new course repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a course by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Course>> {
        sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find course", e))
    }

    /// List published courses.
    pub async fn list_published(&self, page: &PageRequest) -> AppResult<PageResponse<Course>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE is_published = TRUE")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count courses", e)
                })?;

        let courses = sqlx::query_as::<_, Course>(
            "SELECT * FROM courses WHERE is_published = TRUE \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list courses", e))?;

        Ok(PageResponse::new(
            courses,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List a course's lectures in display order.
    pub async fn lectures(&self, course_id: Uuid) -> AppResult<Vec<Lecture>> {
        sqlx::query_as::<_, Lecture>(
            "SELECT * FROM lectures WHERE course_id = $1 ORDER BY position",
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list lectures", e))
    }

    /// Live lecture count for a course.
    pub async fn lecture_count(&self, course_id: Uuid) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lectures WHERE course_id = $1")
            .bind(course_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count lectures", e)
            })?;
        Ok(count as u64)
    }

    /// Find a lecture within a course.
    pub async fn find_lecture(&self, course_id: Uuid, lecture_id: Uuid) -> AppResult<Option<Lecture>> {
        sqlx::query_as::<_, Lecture>("SELECT * FROM lectures WHERE id = $1 AND course_id = $2")
            .bind(lecture_id)
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find lecture", e))
    }

    /// Whether the user appears in the course's enrolled-students set.
    ///
    /// Enrollment rows are instructor/admin-managed input evidence and are
    /// distinct from purchase records.
    pub async fn is_enrolled(&self, user_id: Uuid, course_id: Uuid) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM course_enrollments \
             WHERE user_id = $1 AND course_id = $2)",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check enrollment", e))?;
        Ok(exists)
    }
}
