//! Custom Axum extractors.

pub mod auth;
pub mod pagination;

pub use auth::{AdminUser, AuthUser, MaybeAuthUser};
pub use pagination::PaginationParams;
