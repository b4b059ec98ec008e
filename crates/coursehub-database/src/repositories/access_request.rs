//! Access request repository implementation.
//!
//! The `pending → approved|declined` transition is a compare-and-set on
//! the stored status: the UPDATE only matches rows still in `pending`,
//! so of two racing administrators exactly one wins and the loser gets
//! `InvalidTransition` with nothing mutated.

use sqlx::PgPool;
use uuid::Uuid;

use coursehub_core::error::{AppError, ErrorKind};
use coursehub_core::result::AppResult;
use coursehub_core::types::pagination::{PageRequest, PageResponse};
use coursehub_entity::access::{AccessRequest, PurchaseRecord, PurchaseSource, RequestStatus};

/// Filter for administrator request listings.
#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    /// Restrict to one status.
    pub status: Option<RequestStatus>,
    /// Restrict to one course.
    pub course_id: Option<Uuid>,
}

/// Repository for access request lifecycle operations.
#[derive(Debug, Clone)]
pub struct AccessRequestRepository {
    pool: PgPool,
}

impl AccessRequestRepository {
    /// Create a new access request repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a request by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AccessRequest>> {
        sqlx::query_as::<_, AccessRequest>("SELECT * FROM access_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find request", e))
    }

    /// Find the active (`pending` or `approved`) request for a pair, if any.
    ///
    /// At most one exists; the partial unique index on active requests
    /// backs this invariant.
    pub async fn find_active(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> AppResult<Option<AccessRequest>> {
        sqlx::query_as::<_, AccessRequest>(
            "SELECT * FROM access_requests \
             WHERE user_id = $1 AND course_id = $2 AND status IN ('pending', 'approved')",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find active request", e))
    }

    /// Create a new `pending` request.
    ///
    /// Fails with `DuplicateRequest` when an active request already exists
    /// for the pair. The caller checks first for a friendly message; the
    /// unique-violation mapping here closes the submit race.
    pub async fn create(&self, user_id: Uuid, course_id: Uuid) -> AppResult<AccessRequest> {
        sqlx::query_as::<_, AccessRequest>(
            "INSERT INTO access_requests (user_id, course_id, status) \
             VALUES ($1, $2, 'pending') RETURNING *",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::duplicate_request(
                "An active access request already exists for this course",
            ),
            _ => AppError::with_source(ErrorKind::Database, "Failed to create request", e),
        })
    }

    /// Compare-and-set transition out of `pending` into a terminal status.
    ///
    /// `NotFound` when the row does not exist; `InvalidTransition` when it
    /// exists but is no longer `pending` (already resolved, or the CAS
    /// race was lost).
    pub async fn transition(
        &self,
        request_id: Uuid,
        new_status: RequestStatus,
        decline_reason: Option<&str>,
    ) -> AppResult<AccessRequest> {
        if !RequestStatus::Pending.can_transition_to(new_status) {
            return Err(AppError::invalid_transition(format!(
                "Cannot transition a request to '{new_status}'"
            )));
        }

        let updated = sqlx::query_as::<_, AccessRequest>(
            "UPDATE access_requests \
             SET status = $2, decline_reason = $3, updated_at = NOW() \
             WHERE id = $1 AND status = 'pending' RETURNING *",
        )
        .bind(request_id)
        .bind(new_status)
        .bind(decline_reason)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to transition request", e)
        })?;

        match updated {
            Some(request) => Ok(request),
            None => Err(self.transition_failure(request_id).await?),
        }
    }

    /// Approve a request and record its purchase evidence atomically.
    ///
    /// Both writes happen inside one transaction: if the purchase insert
    /// fails, the status CAS rolls back, so a request can never end up
    /// `approved` without durable purchase evidence.
    pub async fn approve_with_purchase(
        &self,
        request_id: Uuid,
    ) -> AppResult<(AccessRequest, PurchaseRecord)> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let updated = sqlx::query_as::<_, AccessRequest>(
            "UPDATE access_requests \
             SET status = 'approved', updated_at = NOW() \
             WHERE id = $1 AND status = 'pending' RETURNING *",
        )
        .bind(request_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to approve request", e))?;

        let Some(request) = updated else {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM access_requests WHERE id = $1)")
                    .bind(request_id)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(|e| {
                        AppError::with_source(ErrorKind::Database, "Failed to check request", e)
                    })?;
            let _ = tx.rollback().await;
            return Err(if exists {
                AppError::invalid_transition("Request is no longer pending")
            } else {
                AppError::not_found("Access request not found")
            });
        };

        let inserted = sqlx::query_as::<_, PurchaseRecord>(
            "INSERT INTO purchase_records (user_id, course_id, source) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, course_id) DO NOTHING RETURNING *",
        )
        .bind(request.user_id)
        .bind(request.course_id)
        .bind(PurchaseSource::ManualApproval)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record purchase", e))?;

        let purchase = match inserted {
            Some(record) => record,
            None => sqlx::query_as::<_, PurchaseRecord>(
                "SELECT * FROM purchase_records WHERE user_id = $1 AND course_id = $2",
            )
            .bind(request.user_id)
            .bind(request.course_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to re-read purchase", e)
            })?,
        };

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit approval", e)
        })?;

        Ok((request, purchase))
    }

    /// Administrative removal, permitted in any status.
    pub async fn delete(&self, request_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM access_requests WHERE id = $1")
            .bind(request_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete request", e)
            })?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Access request not found"));
        }
        Ok(())
    }

    /// List requests matching a filter, newest first.
    pub async fn list(
        &self,
        filter: &RequestFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AccessRequest>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM access_requests \
             WHERE ($1::request_status IS NULL OR status = $1) \
             AND ($2::uuid IS NULL OR course_id = $2)",
        )
        .bind(filter.status)
        .bind(filter.course_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count requests", e))?;

        let requests = sqlx::query_as::<_, AccessRequest>(
            "SELECT * FROM access_requests \
             WHERE ($1::request_status IS NULL OR status = $1) \
             AND ($2::uuid IS NULL OR course_id = $2) \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4",
        )
        .bind(filter.status)
        .bind(filter.course_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list requests", e))?;

        Ok(PageResponse::new(
            requests,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Count `pending` requests (admin dashboard badge).
    pub async fn count_pending(&self) -> AppResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM access_requests WHERE status = 'pending'")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count pending", e)
                })?;
        Ok(count as u64)
    }

    /// Resolve why a CAS transition matched no rows.
    async fn transition_failure(&self, request_id: Uuid) -> AppResult<AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM access_requests WHERE id = $1)")
                .bind(request_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to check request", e)
                })?;
        Ok(if exists {
            AppError::invalid_transition("Request is no longer pending")
        } else {
            AppError::not_found("Access request not found")
        })
    }
}
