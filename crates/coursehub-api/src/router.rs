//! Route definitions for the CourseHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes as usize;

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(course_routes())
        .merge(access_routes())
        .merge(progress_routes())
        .merge(admin_routes())
        .merge(notification_routes())
        .merge(health_routes());

    let ws_routes = Router::new().route("/ws", get(handlers::ws::ws_upgrade));

    let cors = middleware::cors::build_cors_layer(&state.config.server);

    Router::new()
        .nest("/api", api_routes)
        .merge(ws_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Auth endpoints: register, login, refresh, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/me", get(handlers::auth::me))
}

/// Course catalog
fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/courses", get(handlers::course::list_courses))
        .route("/courses/{id}", get(handlers::course::get_course))
}

/// Access decision and student request flow
fn access_routes() -> Router<AppState> {
    Router::new()
        .route("/courses/{id}/access", get(handlers::access::get_access))
        .route(
            "/courses/{id}/access-requests",
            post(handlers::access::submit_request),
        )
        .route(
            "/courses/{id}/access-requests/mine",
            get(handlers::access::my_request),
        )
        .route(
            "/courses/{id}/enroll-free",
            post(handlers::access::enroll_free),
        )
}

/// Lecture progress and completion
fn progress_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/courses/{id}/lectures/{lecture_id}/viewed",
            put(handlers::progress::set_viewed),
        )
        .route(
            "/courses/{id}/lectures/{lecture_id}/playback",
            post(handlers::progress::report_playback),
        )
        .route(
            "/courses/{id}/progress",
            get(handlers::progress::get_progress),
        )
        .route(
            "/courses/{id}/complete",
            put(handlers::progress::mark_complete),
        )
        .route(
            "/courses/{id}/incomplete",
            put(handlers::progress::mark_incomplete),
        )
}

/// Administrator request-verification tooling
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/access-requests",
            get(handlers::admin::list_requests),
        )
        .route(
            "/admin/access-requests/pending-count",
            get(handlers::admin::pending_count),
        )
        .route(
            "/admin/access-requests/{id}/approve",
            put(handlers::admin::approve_request),
        )
        .route(
            "/admin/access-requests/{id}/decline",
            put(handlers::admin::decline_request),
        )
        .route(
            "/admin/access-requests/{id}",
            delete(handlers::admin::delete_request),
        )
        .route(
            "/admin/courses/{id}/purchases",
            post(handlers::admin::record_purchase),
        )
}

/// Notifications
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(handlers::notification::list_notifications),
        )
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/{id}/read",
            put(handlers::notification::mark_read),
        )
}

/// Health
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
