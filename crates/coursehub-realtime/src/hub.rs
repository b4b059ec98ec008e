//! Typed publish/subscribe facade used by the service layer.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use coursehub_entity::notification::Notification;

use crate::channel::{access_channel, user_channel};
use crate::message::OutboundMessage;
use crate::pubsub::MemoryPubSub;

/// Publishes invalidation events on state changes and hands out
/// subscriptions to interested connections.
#[derive(Debug, Clone)]
pub struct InvalidationHub {
    pubsub: Arc<MemoryPubSub>,
}

impl InvalidationHub {
    /// Create a hub over the given pub/sub backend.
    pub fn new(pubsub: Arc<MemoryPubSub>) -> Self {
        Self { pubsub }
    }

    /// Announce that the access decision for a pair changed.
    ///
    /// Published on both the pair channel and the user channel so a
    /// client watching either one re-reads.
    pub async fn publish_access_changed(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        decision: &str,
        reason: &str,
    ) {
        let msg = OutboundMessage::AccessChanged {
            user_id,
            course_id,
            decision: decision.to_string(),
            reason: reason.to_string(),
            timestamp: Utc::now(),
        };
        debug!(%user_id, %course_id, decision, "publishing access invalidation");
        self.pubsub
            .publish(&access_channel(user_id, course_id), msg.clone())
            .await;
        self.pubsub.publish(&user_channel(user_id), msg).await;
    }

    /// Announce that an access request reached a terminal status.
    pub async fn publish_request_resolved(
        &self,
        request_id: Uuid,
        user_id: Uuid,
        course_id: Uuid,
        status: &str,
        reason: Option<&str>,
    ) {
        let msg = OutboundMessage::RequestResolved {
            request_id,
            user_id,
            course_id,
            status: status.to_string(),
            reason: reason.map(str::to_string),
            timestamp: Utc::now(),
        };
        debug!(%request_id, status, "publishing request resolution");
        self.pubsub.publish(&user_channel(user_id), msg).await;
    }

    /// Announce a change to a user's course progress summary.
    pub async fn publish_progress_updated(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        percentage: u8,
        completed: bool,
    ) {
        let msg = OutboundMessage::ProgressUpdated {
            user_id,
            course_id,
            percentage,
            completed,
            timestamp: Utc::now(),
        };
        self.pubsub.publish(&user_channel(user_id), msg).await;
    }

    /// Push a stored notification to the user's channel.
    pub async fn publish_notification(&self, notification: &Notification) {
        let msg = OutboundMessage::Notification {
            id: notification.id,
            category: notification.category.as_str().to_string(),
            title: notification.title.clone(),
            body: notification.body.clone(),
            course_id: notification.course_id,
            timestamp: notification.created_at,
        };
        self.pubsub
            .publish(&user_channel(notification.user_id), msg)
            .await;
    }

    /// Subscribe to access-decision changes for one (user, course) pair.
    pub async fn subscribe_access(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> broadcast::Receiver<OutboundMessage> {
        self.pubsub
            .subscribe(&access_channel(user_id, course_id))
            .await
    }

    /// Subscribe to all events for one user.
    pub async fn subscribe_user(&self, user_id: Uuid) -> broadcast::Receiver<OutboundMessage> {
        self.pubsub.subscribe(&user_channel(user_id)).await
    }
}
