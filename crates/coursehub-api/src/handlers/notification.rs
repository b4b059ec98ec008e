//! Notification handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use coursehub_entity::notification::Notification;

use crate::dto::response::{ApiResponse, CountResponse, PaginatedResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<Notification>>>, ApiError> {
    let page = state
        .notification_service
        .list(auth.user_id, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page.into())))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.notification_service.count_unread(auth.user_id).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// PUT /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Notification>>, ApiError> {
    let notification = state
        .notification_service
        .mark_read(auth.user_id, notification_id)
        .await?;
    Ok(Json(ApiResponse::ok(notification)))
}
