//! Administrator handlers for the access-request workflow.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use uuid::Uuid;

use coursehub_database::repositories::access_request::RequestFilter;
use coursehub_entity::access::{AccessRequest, PurchaseRecord, RequestStatus};

use crate::dto::request::{DeclineRequest, RecordPurchaseRequest};
use crate::dto::response::{ApiResponse, CountResponse, MessageResponse, PaginatedResponse};
use crate::error::ApiError;
use crate::extractors::{AdminUser, PaginationParams};
use crate::handlers::validated;
use crate::state::AppState;

/// Query parameters for the admin request listing.
///
/// Pagination fields are inlined rather than flattened; serde's query
/// deserializer cannot route numeric fields through a flatten.
#[derive(Debug, Deserialize)]
pub struct ListRequestsQuery {
    /// Filter by status.
    pub status: Option<RequestStatus>,
    /// Filter by course.
    pub course_id: Option<Uuid>,
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Items per page.
    pub per_page: Option<u64>,
}

/// GET /api/admin/access-requests
pub async fn list_requests(
    State(state): State<AppState>,
    admin: AdminUser,
    Query(query): Query<ListRequestsQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<AccessRequest>>>, ApiError> {
    let filter = RequestFilter {
        status: query.status,
        course_id: query.course_id,
    };
    let pagination = PaginationParams {
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(25),
    };
    let page = state
        .request_service
        .list(&admin.0, &filter, &pagination.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page.into())))
}

/// GET /api/admin/access-requests/pending-count
pub async fn pending_count(
    State(state): State<AppState>,
    admin: AdminUser,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.request_service.count_pending(&admin.0).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// PUT /api/admin/access-requests/{id}/approve
pub async fn approve_request(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(request_id): Path<Uuid>,
) -> Result<Json<ApiResponse<AccessRequest>>, ApiError> {
    let (request, _purchase) = state.request_service.approve(&admin.0, request_id).await?;
    Ok(Json(ApiResponse::ok(request)))
}

/// PUT /api/admin/access-requests/{id}/decline
pub async fn decline_request(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(request_id): Path<Uuid>,
    Json(req): Json<DeclineRequest>,
) -> Result<Json<ApiResponse<AccessRequest>>, ApiError> {
    let req = validated(req)?;
    let request = state
        .request_service
        .decline(&admin.0, request_id, &req.reason)
        .await?;
    Ok(Json(ApiResponse::ok(request)))
}

/// DELETE /api/admin/access-requests/{id}
pub async fn delete_request(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(request_id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.request_service.delete(&admin.0, request_id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Access request deleted".to_string(),
    })))
}

/// POST /api/admin/courses/{id}/purchases
///
/// Records a gateway-settled payment on a user's behalf. Stands in for
/// the gateway callback, which is out of scope.
pub async fn record_purchase(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(course_id): Path<Uuid>,
    Json(req): Json<RecordPurchaseRequest>,
) -> Result<Json<ApiResponse<PurchaseRecord>>, ApiError> {
    let req = validated(req)?;
    let record = state
        .access_service
        .record_gateway_purchase(req.user_id, course_id, &req.reference)
        .await?;
    Ok(Json(ApiResponse::ok(record)))
}
