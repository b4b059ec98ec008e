//! Progress tracker service.
//!
//! Reachable only when the access decision for the pair is currently
//! `granted`; every call re-verifies that precondition against fresh
//! evidence rather than trusting anything the caller cached, because
//! access can lapse between a decision read and a progress write.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use coursehub_core::error::AppError;
use coursehub_core::result::AppResult;
use coursehub_database::repositories::{CourseRepository, ProgressRepository};
use coursehub_entity::progress::CourseProgressSummary;
use coursehub_realtime::InvalidationHub;

use crate::access::AccessService;

/// Playback fraction at which a lecture counts as viewed.
const AUTO_VIEWED_THRESHOLD: f64 = 0.95;

/// Records lecture viewing and computes course completion.
#[derive(Debug, Clone)]
pub struct ProgressService {
    /// Progress repository.
    progress_repo: Arc<ProgressRepository>,
    /// Course repository for the live lecture list.
    course_repo: Arc<CourseRepository>,
    /// Access service for the granted precondition.
    access: Arc<AccessService>,
    /// Invalidation hub.
    hub: Arc<InvalidationHub>,
}

impl ProgressService {
    /// Creates a new progress service.
    pub fn new(
        progress_repo: Arc<ProgressRepository>,
        course_repo: Arc<CourseRepository>,
        access: Arc<AccessService>,
        hub: Arc<InvalidationHub>,
    ) -> Self {
        Self {
            progress_repo,
            course_repo,
            access,
            hub,
        }
    }

    /// Upsert a lecture's viewed flag and return the fresh summary.
    ///
    /// Idempotent: setting the same value twice changes nothing and
    /// never duplicates rows. A stale concurrent write (older
    /// timestamp) loses to the stored row.
    pub async fn set_lecture_viewed(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        lecture_id: Uuid,
        viewed: bool,
    ) -> AppResult<CourseProgressSummary> {
        self.ensure_granted(user_id, course_id).await?;

        self.course_repo
            .find_lecture(course_id, lecture_id)
            .await?
            .ok_or_else(|| AppError::not_found("Lecture not found in this course"))?;

        self.progress_repo
            .upsert_viewed(user_id, course_id, lecture_id, viewed, Utc::now())
            .await?;

        let summary = self.summarize(user_id, course_id).await?;
        self.hub
            .publish_progress_updated(user_id, course_id, summary.percentage, summary.completed)
            .await;
        Ok(summary)
    }

    /// Handle a playback report from the video player.
    ///
    /// Crossing the 95% threshold marks the lecture viewed; repeated
    /// reports above it hit the same idempotent upsert and change
    /// nothing. Reports below the threshold write nothing.
    pub async fn report_playback(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        lecture_id: Uuid,
        played_fraction: f64,
    ) -> AppResult<CourseProgressSummary> {
        if !(0.0..=1.0).contains(&played_fraction) {
            return Err(AppError::validation(
                "Played fraction must be between 0 and 1",
            ));
        }

        if played_fraction >= AUTO_VIEWED_THRESHOLD {
            return self
                .set_lecture_viewed(user_id, course_id, lecture_id, true)
                .await;
        }

        self.ensure_granted(user_id, course_id).await?;
        self.summarize(user_id, course_id).await
    }

    /// Compute the current progress summary for a pair.
    ///
    /// The total lecture count is read live, so removing lectures
    /// changes the percentage of an otherwise-unchanged viewed set.
    pub async fn compute_progress(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> AppResult<CourseProgressSummary> {
        self.ensure_granted(user_id, course_id).await?;
        self.summarize(user_id, course_id).await
    }

    /// Set the explicit completed override.
    ///
    /// Independent of percentage: a user may mark complete before
    /// watching everything, and lecture-level updates never revert it.
    pub async fn mark_course_complete(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> AppResult<CourseProgressSummary> {
        self.set_override(user_id, course_id, true).await
    }

    /// Clear the explicit completed override.
    pub async fn mark_course_incomplete(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> AppResult<CourseProgressSummary> {
        self.set_override(user_id, course_id, false).await
    }

    async fn set_override(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        completed: bool,
    ) -> AppResult<CourseProgressSummary> {
        self.ensure_granted(user_id, course_id).await?;

        self.progress_repo
            .set_completion(user_id, course_id, completed)
            .await?;
        info!(%user_id, %course_id, completed, "course completion override set");

        let summary = self.summarize(user_id, course_id).await?;
        self.hub
            .publish_progress_updated(user_id, course_id, summary.percentage, summary.completed)
            .await;
        Ok(summary)
    }

    /// Build the derived summary from live data.
    ///
    /// Dangling rows from deleted lectures are pruned lazily here and
    /// excluded from the viewed set either way.
    async fn summarize(&self, user_id: Uuid, course_id: Uuid) -> AppResult<CourseProgressSummary> {
        self.progress_repo.prune_dangling(user_id, course_id).await?;

        let viewed = self
            .progress_repo
            .viewed_lecture_ids(user_id, course_id)
            .await?;
        let total = self.course_repo.lecture_count(course_id).await?;
        let completed = self
            .progress_repo
            .find_completion(user_id, course_id)
            .await?
            .map(|row| row.completed)
            .unwrap_or(false);

        Ok(CourseProgressSummary::new(viewed, total, completed))
    }

    async fn ensure_granted(&self, user_id: Uuid, course_id: Uuid) -> AppResult<()> {
        let decision = self.access.get_decision(user_id, course_id).await?;
        if !decision.is_granted() {
            return Err(AppError::forbidden(
                "Progress tracking requires granted access to the course",
            ));
        }
        Ok(())
    }
}
