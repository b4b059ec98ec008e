//! Authentication extractors — pull the JWT from the Authorization
//! header, validate it, and inject a `RequestContext`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use coursehub_core::error::AppError;
use coursehub_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn context_from_parts(parts: &Parts, state: &AppState) -> Result<RequestContext, AppError> {
    let auth_header = parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::unauthorized("Invalid Authorization header format"))?;

    let claims = state.jwt_decoder.decode_access_token(token)?;

    Ok(RequestContext::new(
        claims.sub,
        claims.role,
        claims.username,
    ))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(AuthUser(context_from_parts(parts, state)?))
    }
}

/// Like [`AuthUser`] but additionally requires the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub RequestContext);

impl std::ops::Deref for AdminUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = context_from_parts(parts, state)?;
        if !ctx.is_admin() {
            return Err(ApiError(AppError::forbidden(
                "Administrator role required",
            )));
        }
        Ok(AdminUser(ctx))
    }
}

/// Optional authentication for endpoints viewable anonymously.
///
/// A missing Authorization header yields `None`; a present but invalid
/// token is still rejected.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<RequestContext>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if parts.headers.get("authorization").is_none() {
            return Ok(MaybeAuthUser(None));
        }
        Ok(MaybeAuthUser(Some(context_from_parts(parts, state)?)))
    }
}
