//! Progress tracker handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use coursehub_entity::progress::CourseProgressSummary;

use crate::dto::request::{PlaybackRequest, SetViewedRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::handlers::validated;
use crate::state::AppState;

/// PUT /api/courses/{id}/lectures/{lecture_id}/viewed
pub async fn set_viewed(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((course_id, lecture_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<SetViewedRequest>,
) -> Result<Json<ApiResponse<CourseProgressSummary>>, ApiError> {
    let summary = state
        .progress_service
        .set_lecture_viewed(auth.user_id, course_id, lecture_id, req.viewed)
        .await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// POST /api/courses/{id}/lectures/{lecture_id}/playback
pub async fn report_playback(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((course_id, lecture_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<PlaybackRequest>,
) -> Result<Json<ApiResponse<CourseProgressSummary>>, ApiError> {
    let req = validated(req)?;
    let summary = state
        .progress_service
        .report_playback(auth.user_id, course_id, lecture_id, req.played_fraction)
        .await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// GET /api/courses/{id}/progress
pub async fn get_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(course_id): Path<Uuid>,
) -> Result<Json<ApiResponse<CourseProgressSummary>>, ApiError> {
    let summary = state
        .progress_service
        .compute_progress(auth.user_id, course_id)
        .await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// PUT /api/courses/{id}/complete
pub async fn mark_complete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(course_id): Path<Uuid>,
) -> Result<Json<ApiResponse<CourseProgressSummary>>, ApiError> {
    let summary = state
        .progress_service
        .mark_course_complete(auth.user_id, course_id)
        .await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// PUT /api/courses/{id}/incomplete
pub async fn mark_incomplete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(course_id): Path<Uuid>,
) -> Result<Json<ApiResponse<CourseProgressSummary>>, ApiError> {
    let summary = state
        .progress_service
        .mark_course_incomplete(auth.user_id, course_id)
        .await?;
    Ok(Json(ApiResponse::ok(summary)))
}
