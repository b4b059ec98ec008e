//! Access decision reads and purchase evidence writes.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use coursehub_core::error::AppError;
use coursehub_core::result::AppResult;
use coursehub_database::repositories::{
    AccessRequestRepository, CourseRepository, PurchaseRepository,
};
use coursehub_entity::access::PurchaseRecord;
use coursehub_entity::access::PurchaseSource;
use coursehub_entity::course::Course;
use coursehub_realtime::InvalidationHub;

use super::decision::{AccessDecision, AccessEvidence, decide};

/// Computes access decisions and records purchase evidence.
#[derive(Debug, Clone)]
pub struct AccessService {
    /// Course repository (price, enrollment set).
    course_repo: Arc<CourseRepository>,
    /// Purchase record repository.
    purchase_repo: Arc<PurchaseRepository>,
    /// Access request repository.
    request_repo: Arc<AccessRequestRepository>,
    /// Invalidation hub for push updates.
    hub: Arc<InvalidationHub>,
}

impl AccessService {
    /// Creates a new access service.
    pub fn new(
        course_repo: Arc<CourseRepository>,
        purchase_repo: Arc<PurchaseRepository>,
        request_repo: Arc<AccessRequestRepository>,
        hub: Arc<InvalidationHub>,
    ) -> Self {
        Self {
            course_repo,
            purchase_repo,
            request_repo,
            hub,
        }
    }

    /// Compute the effective access decision for a (user, course) pair.
    ///
    /// Evidence is re-read on every call; nothing is cached here, so
    /// the answer is never staler than the caller's own polling
    /// interval.
    pub async fn get_decision(&self, user_id: Uuid, course_id: Uuid) -> AppResult<AccessDecision> {
        let course = self.require_course(course_id).await?;
        let evidence = self.gather_evidence(user_id, &course).await?;
        Ok(decide(&evidence))
    }

    /// Self-enroll in a free course, producing durable purchase
    /// evidence with a free-enrollment marker.
    pub async fn enroll_free(&self, user_id: Uuid, course_id: Uuid) -> AppResult<PurchaseRecord> {
        let course = self.require_course(course_id).await?;
        if !course.is_free() {
            return Err(AppError::not_free(
                "Course is not free; purchase or request access instead",
            ));
        }

        let record = self
            .purchase_repo
            .record(user_id, course_id, PurchaseSource::FreeEnrollment, None)
            .await?;

        info!(%user_id, %course_id, "free enrollment recorded");
        self.publish_decision(user_id, course_id).await?;
        Ok(record)
    }

    /// Record a settled gateway payment for a pair.
    ///
    /// Idempotent per (user, course): a duplicate callback returns the
    /// existing record untouched.
    pub async fn record_gateway_purchase(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        reference: &str,
    ) -> AppResult<PurchaseRecord> {
        self.require_course(course_id).await?;

        let record = self
            .purchase_repo
            .record(user_id, course_id, PurchaseSource::Gateway, Some(reference))
            .await?;

        info!(%user_id, %course_id, reference, "gateway purchase recorded");
        self.publish_decision(user_id, course_id).await?;
        Ok(record)
    }

    /// Recompute the decision and publish it on the invalidation
    /// channels.
    pub(crate) async fn publish_decision(&self, user_id: Uuid, course_id: Uuid) -> AppResult<()> {
        let decision = self.get_decision(user_id, course_id).await?;
        self.hub
            .publish_access_changed(
                user_id,
                course_id,
                decision.status.as_str(),
                decision.reason.as_str(),
            )
            .await;
        Ok(())
    }

    /// Assemble a fresh evidence snapshot for the pure decision engine.
    async fn gather_evidence(&self, user_id: Uuid, course: &Course) -> AppResult<AccessEvidence> {
        let has_purchase = self.purchase_repo.exists(user_id, course.id).await?;
        let is_enrolled = self.course_repo.is_enrolled(user_id, course.id).await?;
        let request_status = self
            .request_repo
            .find_active(user_id, course.id)
            .await?
            .map(|request| request.status);

        Ok(AccessEvidence {
            price: course.price.clone(),
            has_purchase,
            is_enrolled,
            request_status,
        })
    }

    async fn require_course(&self, course_id: Uuid) -> AppResult<Course> {
        self.course_repo
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found"))
    }
}
