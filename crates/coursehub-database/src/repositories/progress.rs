//! Lecture progress repository implementation.
//!
//! Progress rows are partitioned by (user, course, lecture). Concurrent
//! updates to the same row use last-write-wins with a monotonic
//! timestamp guard: an upsert whose timestamp is older than the stored
//! row's is dropped, so a late-arriving "viewed = false" cannot
//! un-complete a lecture a newer write already recorded.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use coursehub_core::error::{AppError, ErrorKind};
use coursehub_core::result::AppResult;
use coursehub_entity::progress::{CourseCompletion, LectureProgress};

/// Repository for lecture progress and the course completion override.
#[derive(Debug, Clone)]
pub struct ProgressRepository {
    pool: PgPool,
}

impl ProgressRepository {
    /// Create a new progress repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upsert a lecture's viewed flag with the monotonic guard.
    ///
    /// Returns the stored row after the write. A stale write (older
    /// timestamp than the stored row) leaves the row untouched and
    /// returns the current state.
    pub async fn upsert_viewed(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        lecture_id: Uuid,
        viewed: bool,
        at: DateTime<Utc>,
    ) -> AppResult<LectureProgress> {
        let written = sqlx::query_as::<_, LectureProgress>(
            "INSERT INTO lecture_progress (user_id, course_id, lecture_id, viewed, updated_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id, course_id, lecture_id) DO UPDATE \
             SET viewed = EXCLUDED.viewed, updated_at = EXCLUDED.updated_at \
             WHERE lecture_progress.updated_at <= EXCLUDED.updated_at \
             RETURNING *",
        )
        .bind(user_id)
        .bind(course_id)
        .bind(lecture_id)
        .bind(viewed)
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert progress", e))?;

        match written {
            Some(row) => Ok(row),
            // Guard rejected the write: return the newer stored row.
            None => sqlx::query_as::<_, LectureProgress>(
                "SELECT * FROM lecture_progress \
                 WHERE user_id = $1 AND course_id = $2 AND lecture_id = $3",
            )
            .bind(user_id)
            .bind(course_id)
            .bind(lecture_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to re-read progress", e)
            }),
        }
    }

    /// IDs of viewed lectures that still exist in the course.
    ///
    /// Dangling rows from deleted lectures are excluded by the join, so
    /// they never count toward the percentage.
    pub async fn viewed_lecture_ids(&self, user_id: Uuid, course_id: Uuid) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar(
            "SELECT lp.lecture_id FROM lecture_progress lp \
             JOIN lectures l ON l.id = lp.lecture_id \
             WHERE lp.user_id = $1 AND lp.course_id = $2 AND lp.viewed = TRUE \
             ORDER BY l.position",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list viewed", e))
    }

    /// Lazily prune progress rows whose lecture no longer exists.
    ///
    /// Returns the number of pruned rows. Pruned rows are never
    /// resurrected; re-adding a lecture with the same ID would start
    /// from unviewed.
    pub async fn prune_dangling(&self, user_id: Uuid, course_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM lecture_progress \
             WHERE user_id = $1 AND course_id = $2 \
             AND lecture_id NOT IN (SELECT id FROM lectures WHERE course_id = $2)",
        )
        .bind(user_id)
        .bind(course_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to prune progress", e))?;
        Ok(result.rows_affected())
    }

    /// Read the explicit completion override, if one was ever set.
    pub async fn find_completion(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> AppResult<Option<CourseCompletion>> {
        sqlx::query_as::<_, CourseCompletion>(
            "SELECT * FROM course_completions WHERE user_id = $1 AND course_id = $2",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find completion", e))
    }

    /// Set the explicit completion override.
    pub async fn set_completion(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        completed: bool,
    ) -> AppResult<CourseCompletion> {
        sqlx::query_as::<_, CourseCompletion>(
            "INSERT INTO course_completions (user_id, course_id, completed, updated_at) \
             VALUES ($1, $2, $3, NOW()) \
             ON CONFLICT (user_id, course_id) DO UPDATE \
             SET completed = EXCLUDED.completed, updated_at = NOW() \
             RETURNING *",
        )
        .bind(user_id)
        .bind(course_id)
        .bind(completed)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to set completion", e))
    }
}
