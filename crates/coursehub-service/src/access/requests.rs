//! Manual access-request workflow: submit, approve, decline.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use coursehub_core::error::AppError;
use coursehub_core::result::AppResult;
use coursehub_core::types::pagination::{PageRequest, PageResponse};
use coursehub_database::repositories::access_request::RequestFilter;
use coursehub_database::repositories::{AccessRequestRepository, CourseRepository};
use coursehub_entity::access::{AccessRequest, PurchaseRecord, RequestStatus};
use coursehub_realtime::InvalidationHub;

use crate::context::RequestContext;
use crate::notification::NotificationService;

use super::service::AccessService;

/// Governs the access-request lifecycle.
///
/// Students submit; administrators resolve. All terminal transitions
/// are compare-and-set in the repository, so concurrent admin actions
/// on the same request produce exactly one winner.
#[derive(Debug, Clone)]
pub struct AccessRequestService {
    /// Access request repository.
    request_repo: Arc<AccessRequestRepository>,
    /// Course repository for submit preconditions.
    course_repo: Arc<CourseRepository>,
    /// Access service for decision invalidation.
    access: Arc<AccessService>,
    /// Notification service for resolution messages.
    notifications: Arc<NotificationService>,
    /// Invalidation hub.
    hub: Arc<InvalidationHub>,
}

impl AccessRequestService {
    /// Creates a new access request service.
    pub fn new(
        request_repo: Arc<AccessRequestRepository>,
        course_repo: Arc<CourseRepository>,
        access: Arc<AccessService>,
        notifications: Arc<NotificationService>,
        hub: Arc<InvalidationHub>,
    ) -> Self {
        Self {
            request_repo,
            course_repo,
            access,
            notifications,
            hub,
        }
    }

    /// Submit a new access request for a paid course.
    ///
    /// Fails with `NotFound` when the course does not exist, `NotFree`
    /// when the course is free (free courses need no request), and
    /// `DuplicateRequest` when a `pending` or `approved` request
    /// already exists for the pair. A prior `declined` request does not
    /// block.
    pub async fn submit(&self, user_id: Uuid, course_id: Uuid) -> AppResult<AccessRequest> {
        let course = self
            .course_repo
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found"))?;

        if course.is_free() {
            return Err(AppError::not_free(
                "Course is free; enroll directly instead of requesting access",
            ));
        }

        // The partial unique index on active requests backs this up:
        // two concurrent submits cannot both succeed.
        let request = self.request_repo.create(user_id, course_id).await?;

        info!(request_id = %request.id, %user_id, %course_id, "access request submitted");
        self.access.publish_decision(user_id, course_id).await?;
        Ok(request)
    }

    /// The caller's active request for a course, if any.
    ///
    /// Used to route a `DuplicateRequest` rejection to the existing
    /// request's status instead of an opaque error.
    pub async fn active_for(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> AppResult<Option<AccessRequest>> {
        self.request_repo.find_active(user_id, course_id).await
    }

    /// Approve a pending request and record its purchase evidence.
    ///
    /// Both writes are atomic: if the purchase insert fails, the status
    /// transition rolls back. A concurrent approve/decline on the same
    /// request loses the compare-and-set and gets `InvalidTransition`.
    pub async fn approve(
        &self,
        ctx: &RequestContext,
        request_id: Uuid,
    ) -> AppResult<(AccessRequest, PurchaseRecord)> {
        self.require_admin(ctx)?;

        let (request, purchase) = self.request_repo.approve_with_purchase(request_id).await?;

        info!(
            %request_id,
            user_id = %request.user_id,
            course_id = %request.course_id,
            admin = %ctx.user_id,
            "access request approved"
        );

        self.notifications
            .notify_request_resolved(&request, None)
            .await?;
        self.hub
            .publish_request_resolved(
                request.id,
                request.user_id,
                request.course_id,
                RequestStatus::Approved.as_str(),
                None,
            )
            .await;
        self.access
            .publish_decision(request.user_id, request.course_id)
            .await?;

        Ok((request, purchase))
    }

    /// Decline a pending request with a mandatory reason.
    ///
    /// Does not create a purchase record and does not block a later
    /// resubmission.
    pub async fn decline(
        &self,
        ctx: &RequestContext,
        request_id: Uuid,
        reason: &str,
    ) -> AppResult<AccessRequest> {
        self.require_admin(ctx)?;

        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::validation("Decline reason must not be empty"));
        }

        let request = self
            .request_repo
            .transition(request_id, RequestStatus::Declined, Some(reason))
            .await?;

        info!(%request_id, admin = %ctx.user_id, "access request declined");

        self.notifications
            .notify_request_resolved(&request, Some(reason))
            .await?;
        self.hub
            .publish_request_resolved(
                request.id,
                request.user_id,
                request.course_id,
                RequestStatus::Declined.as_str(),
                Some(reason),
            )
            .await;
        self.access
            .publish_decision(request.user_id, request.course_id)
            .await?;

        Ok(request)
    }

    /// Administrative purge of a request in any status.
    pub async fn delete(&self, ctx: &RequestContext, request_id: Uuid) -> AppResult<()> {
        self.require_admin(ctx)?;

        let request = self
            .request_repo
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| AppError::not_found("Access request not found"))?;

        self.request_repo.delete(request_id).await?;
        info!(%request_id, admin = %ctx.user_id, "access request purged");

        // Purging an approved/pending request can change the decision.
        self.access
            .publish_decision(request.user_id, request.course_id)
            .await?;
        Ok(())
    }

    /// Admin listing with optional status/course filters.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        filter: &RequestFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AccessRequest>> {
        self.require_admin(ctx)?;
        self.request_repo.list(filter, page).await
    }

    /// Count of requests awaiting verification, for the admin badge.
    pub async fn count_pending(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.require_admin(ctx)?;
        self.request_repo.count_pending().await
    }

    fn require_admin(&self, ctx: &RequestContext) -> AppResult<()> {
        if !ctx.is_admin() {
            return Err(AppError::forbidden(
                "Only administrators may manage access requests",
            ));
        }
        Ok(())
    }
}
