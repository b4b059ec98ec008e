//! Purchase record repository implementation.
//!
//! Purchase rows are append-only evidence, unique per (user, course).
//! Recording is idempotent: a second attempt for an already-purchased
//! pair returns the existing row instead of erroring.

use sqlx::PgPool;
use uuid::Uuid;

use coursehub_core::error::{AppError, ErrorKind};
use coursehub_core::result::AppResult;
use coursehub_entity::access::{PurchaseRecord, PurchaseSource};

/// Repository for purchase evidence.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    pool: PgPool,
}

impl PurchaseRepository {
    /// Create a new purchase repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record purchase evidence for a (user, course) pair.
    ///
    /// Idempotent: `ON CONFLICT DO NOTHING` followed by a read-back, so a
    /// duplicate call returns the original row (including its original
    /// source) untouched.
    pub async fn record(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        source: PurchaseSource,
        reference: Option<&str>,
    ) -> AppResult<PurchaseRecord> {
        let inserted = sqlx::query_as::<_, PurchaseRecord>(
            "INSERT INTO purchase_records (user_id, course_id, source, reference) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, course_id) DO NOTHING RETURNING *",
        )
        .bind(user_id)
        .bind(course_id)
        .bind(source)
        .bind(reference)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record purchase", e))?;

        match inserted {
            Some(record) => Ok(record),
            None => self.find(user_id, course_id).await?.ok_or_else(|| {
                // Conflict fired but the row is gone: only possible if an
                // administrative purge raced the read-back.
                AppError::database("Purchase record disappeared during idempotent re-read")
            }),
        }
    }

    /// Find the purchase record for a (user, course) pair.
    pub async fn find(&self, user_id: Uuid, course_id: Uuid) -> AppResult<Option<PurchaseRecord>> {
        sqlx::query_as::<_, PurchaseRecord>(
            "SELECT * FROM purchase_records WHERE user_id = $1 AND course_id = $2",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find purchase", e))
    }

    /// Whether purchase evidence exists for a (user, course) pair.
    pub async fn exists(&self, user_id: Uuid, course_id: Uuid) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM purchase_records \
             WHERE user_id = $1 AND course_id = $2)",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check purchase", e))?;
        Ok(exists)
    }
}
