//! Access decision and access-request handlers (student-facing).

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use coursehub_core::error::{AppError, ErrorKind};
use coursehub_entity::access::{AccessRequest, PurchaseRecord};

use crate::dto::response::{AccessDecisionResponse, ApiResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/courses/{id}/access
///
/// Polled by the course-detail page while a request is pending; the
/// response carries a poll-interval hint in that case.
pub async fn get_access(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(course_id): Path<Uuid>,
) -> Result<Json<ApiResponse<AccessDecisionResponse>>, ApiError> {
    let decision = state
        .access_service
        .get_decision(auth.user_id, course_id)
        .await?;

    Ok(Json(ApiResponse::ok(AccessDecisionResponse::from_decision(
        &decision,
        state.config.realtime.suggested_poll_interval_seconds,
    ))))
}

/// POST /api/courses/{id}/access-requests
///
/// A duplicate submit is answered with the existing request's status so
/// the client can route the student there instead of showing an opaque
/// conflict.
pub async fn submit_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(course_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ApiResponse<AccessRequest>>), ApiError> {
    match state.request_service.submit(auth.user_id, course_id).await {
        Ok(request) => Ok((StatusCode::CREATED, Json(ApiResponse::ok(request)))),
        Err(err) if err.is_kind(ErrorKind::DuplicateRequest) => {
            let existing = state
                .request_service
                .active_for(auth.user_id, course_id)
                .await?;
            let status = existing
                .map(|request| request.status.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            Err(ApiError(AppError::duplicate_request(format!(
                "An active access request already exists (status: {status})"
            ))))
        }
        Err(err) => Err(err.into()),
    }
}

/// GET /api/courses/{id}/access-requests/mine
pub async fn my_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(course_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Option<AccessRequest>>>, ApiError> {
    let request = state
        .request_service
        .active_for(auth.user_id, course_id)
        .await?;
    Ok(Json(ApiResponse::ok(request)))
}

/// POST /api/courses/{id}/enroll-free
pub async fn enroll_free(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(course_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ApiResponse<PurchaseRecord>>), ApiError> {
    let record = state
        .access_service
        .enroll_free(auth.user_id, course_id)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(record))))
}
