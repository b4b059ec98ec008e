//! Notification service: persists rows and pushes them to the hub.
//!
//! Delivery mechanics beyond the in-process push channel are out of
//! scope; a disconnected user reads stored rows on the next poll.

use std::sync::Arc;

use uuid::Uuid;

use coursehub_core::result::AppResult;
use coursehub_core::types::pagination::{PageRequest, PageResponse};
use coursehub_database::repositories::NotificationRepository;
use coursehub_entity::access::{AccessRequest, RequestStatus};
use coursehub_entity::notification::{Notification, NotificationCategory};
use coursehub_realtime::InvalidationHub;

/// Creates and reads user notifications.
#[derive(Debug, Clone)]
pub struct NotificationService {
    /// Notification repository.
    repo: Arc<NotificationRepository>,
    /// Invalidation hub for push delivery.
    hub: Arc<InvalidationHub>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(repo: Arc<NotificationRepository>, hub: Arc<InvalidationHub>) -> Self {
        Self { repo, hub }
    }

    /// Notify a requester that their access request was resolved.
    ///
    /// The request must already carry its terminal status; `reason` is
    /// the decline reason when declined.
    pub async fn notify_request_resolved(
        &self,
        request: &AccessRequest,
        reason: Option<&str>,
    ) -> AppResult<Notification> {
        let (category, title, body) = match request.status {
            RequestStatus::Approved => (
                NotificationCategory::RequestApproved,
                "Access request approved".to_string(),
                "Your payment was verified. You now have full access to the course.".to_string(),
            ),
            _ => (
                NotificationCategory::RequestDeclined,
                "Access request declined".to_string(),
                match reason {
                    Some(reason) => format!("Your request was declined: {reason}"),
                    None => "Your request was declined.".to_string(),
                },
            ),
        };

        let notification = self
            .repo
            .create(&Notification::for_request_resolution(
                request.user_id,
                request.course_id,
                category,
                title,
                body,
            ))
            .await?;

        self.hub.publish_notification(&notification).await;
        Ok(notification)
    }

    /// List a user's notifications, newest first.
    pub async fn list(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        self.repo.find_by_user(user_id, page).await
    }

    /// Count of unread notifications, for the client badge.
    pub async fn count_unread(&self, user_id: Uuid) -> AppResult<u64> {
        self.repo.count_unread(user_id).await
    }

    /// Mark one of the user's notifications as read.
    pub async fn mark_read(&self, user_id: Uuid, notification_id: Uuid) -> AppResult<Notification> {
        self.repo.mark_read(notification_id, user_id).await
    }
}
