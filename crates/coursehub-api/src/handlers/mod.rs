//! HTTP request handlers, grouped by domain.

pub mod access;
pub mod admin;
pub mod auth;
pub mod course;
pub mod health;
pub mod notification;
pub mod progress;
pub mod ws;

use validator::Validate;

use coursehub_core::error::AppError;

use crate::error::ApiError;

/// Run DTO validation, mapping failures to a 400 response.
pub(crate) fn validated<T: Validate>(dto: T) -> Result<T, ApiError> {
    dto.validate()
        .map_err(|e| ApiError(AppError::validation(e.to_string())))?;
    Ok(dto)
}
