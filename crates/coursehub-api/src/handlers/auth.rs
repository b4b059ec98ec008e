//! Auth handlers — register, login, refresh, me.

use axum::Json;
use axum::extract::State;

use coursehub_entity::user::UserPublic;

use crate::dto::request::{LoginRequest, RefreshRequest, RegisterRequest};
use crate::dto::response::{ApiResponse, LoginResponse, RefreshResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::handlers::validated;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<UserPublic>>, ApiError> {
    let req = validated(req)?;
    let user = state
        .user_service
        .register(&req.username, &req.email, &req.password)
        .await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let req = validated(req)?;
    let (user, tokens) = state.user_service.login(&req.username, &req.password).await?;

    Ok(Json(ApiResponse::ok(LoginResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        access_expires_at: tokens.access_expires_at,
        refresh_expires_at: tokens.refresh_expires_at,
        user,
    })))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<RefreshResponse>>, ApiError> {
    let (access_token, access_expires_at) =
        state.user_service.refresh(&req.refresh_token).await?;

    Ok(Json(ApiResponse::ok(RefreshResponse {
        access_token,
        access_expires_at,
    })))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserPublic>>, ApiError> {
    let user = state.user_service.profile(auth.user_id).await?;
    Ok(Json(ApiResponse::ok(user)))
}
