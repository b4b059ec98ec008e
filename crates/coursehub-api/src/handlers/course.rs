//! Course catalog handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use coursehub_entity::course::Course;

use crate::dto::response::{ApiResponse, CourseDetailResponse, PaginatedResponse};
use crate::error::ApiError;
use crate::extractors::{MaybeAuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/courses
pub async fn list_courses(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<Course>>>, ApiError> {
    let page = state
        .course_service
        .list_published(&params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page.into())))
}

/// GET /api/courses/{id}
///
/// Anonymous viewers see metadata and free-preview lectures only;
/// authenticated viewers additionally get their access decision and,
/// when granted, every lecture's video reference.
pub async fn get_course(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(course_id): Path<Uuid>,
) -> Result<Json<ApiResponse<CourseDetailResponse>>, ApiError> {
    let detail = state
        .course_service
        .detail(viewer.map(|ctx| ctx.user_id), course_id)
        .await?;

    Ok(Json(ApiResponse::ok(CourseDetailResponse::from_detail(
        detail,
        state.config.realtime.suggested_poll_interval_seconds,
    ))))
}
