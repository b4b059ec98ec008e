//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use coursehub_core::types::pagination::PageResponse;
use coursehub_entity::course::{Course, Lecture};
use coursehub_entity::user::UserPublic;
use coursehub_service::access::AccessDecision;
use coursehub_service::course::CourseDetail;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Access token expiration.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration.
    pub refresh_expires_at: DateTime<Utc>,
    /// User info.
    pub user: UserPublic,
}

/// Refresh response: a new access token only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// New access token.
    pub access_token: String,
    /// Its expiration.
    pub access_expires_at: DateTime<Utc>,
}

/// The viewer's access decision for a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessDecisionResponse {
    /// "granted", "pending", or "denied".
    pub decision: String,
    /// Human-readable reason.
    pub reason: String,
    /// Poll interval hint for pending decisions, in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_interval_seconds: Option<u64>,
}

impl AccessDecisionResponse {
    /// Build from a decision, attaching the poll hint when pending.
    pub fn from_decision(decision: &AccessDecision, poll_interval_seconds: u64) -> Self {
        let pending = decision.status.as_str() == "pending";
        Self {
            decision: decision.status.as_str().to_string(),
            reason: decision.reason.as_str().to_string(),
            poll_interval_seconds: pending.then_some(poll_interval_seconds),
        }
    }
}

/// A lecture with its video reference gated by access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LectureResponse {
    /// Lecture ID.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Display/progress position.
    pub position: i32,
    /// Whether this lecture is viewable without access.
    pub preview_free: bool,
    /// Video reference; absent unless the viewer may play it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_ref: Option<String>,
}

impl LectureResponse {
    /// Gate the video reference on granted access or the preview flag.
    pub fn gated(lecture: &Lecture, granted: bool) -> Self {
        let playable = granted || lecture.preview_free;
        Self {
            id: lecture.id,
            title: lecture.title.clone(),
            position: lecture.position,
            preview_free: lecture.preview_free,
            video_ref: playable.then(|| lecture.video_ref.clone()),
        }
    }
}

/// Course detail with gated lectures and the viewer's decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseDetailResponse {
    /// The course.
    pub course: Course,
    /// Lectures in display order, video references gated.
    pub lectures: Vec<LectureResponse>,
    /// The viewer's decision; absent for anonymous viewers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<AccessDecisionResponse>,
}

impl CourseDetailResponse {
    /// Build from the service-level detail.
    pub fn from_detail(detail: CourseDetail, poll_interval_seconds: u64) -> Self {
        let granted = detail
            .decision
            .as_ref()
            .map(AccessDecision::is_granted)
            .unwrap_or(false);
        let lectures = detail
            .lectures
            .iter()
            .map(|lecture| LectureResponse::gated(lecture, granted))
            .collect();
        Self {
            course: detail.course,
            lectures,
            access: detail
                .decision
                .as_ref()
                .map(|d| AccessDecisionResponse::from_decision(d, poll_interval_seconds)),
        }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T: Serialize> {
    /// Items in this page.
    pub items: Vec<T>,
    /// Total item count.
    pub total: u64,
    /// Current page.
    pub page: u64,
    /// Items per page.
    pub per_page: u64,
    /// Total pages.
    pub total_pages: u64,
}

impl<T: Serialize> From<PageResponse<T>> for PaginatedResponse<T> {
    fn from(page: PageResponse<T>) -> Self {
        Self {
            items: page.items,
            total: page.total_items,
            page: page.page,
            per_page: page.page_size,
            total_pages: page.total_pages,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Count response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    /// Count value.
    pub count: u64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Database connectivity.
    pub database: String,
}
