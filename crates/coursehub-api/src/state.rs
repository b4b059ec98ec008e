//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use coursehub_auth::jwt::{JwtDecoder, JwtEncoder};
use coursehub_auth::password::PasswordHasher;
use coursehub_core::config::AppConfig;
use coursehub_database::repositories::{
    AccessRequestRepository, CourseRepository, NotificationRepository, ProgressRepository,
    PurchaseRepository, UserRepository,
};
use coursehub_realtime::{InvalidationHub, MemoryPubSub};
use coursehub_service::access::{AccessRequestService, AccessService};
use coursehub_service::course::CourseService;
use coursehub_service::notification::NotificationService;
use coursehub_service::progress::ProgressService;
use coursehub_service::user::UserService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool
    pub db_pool: PgPool,

    /// JWT token encoder
    pub jwt_encoder: Arc<JwtEncoder>,
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Password hasher (Argon2)
    pub password_hasher: Arc<PasswordHasher>,

    /// Invalidation hub
    pub hub: Arc<InvalidationHub>,

    /// User service
    pub user_service: Arc<UserService>,
    /// Course catalog service
    pub course_service: Arc<CourseService>,
    /// Access decision service
    pub access_service: Arc<AccessService>,
    /// Access request workflow service
    pub request_service: Arc<AccessRequestService>,
    /// Progress tracker service
    pub progress_service: Arc<ProgressService>,
    /// Notification service
    pub notification_service: Arc<NotificationService>,
}

impl AppState {
    /// Wire the full dependency graph from a config and a connected pool.
    pub fn build(config: Arc<AppConfig>, db_pool: PgPool) -> Self {
        let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        let password_hasher = Arc::new(PasswordHasher::new());

        let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
        let course_repo = Arc::new(CourseRepository::new(db_pool.clone()));
        let purchase_repo = Arc::new(PurchaseRepository::new(db_pool.clone()));
        let request_repo = Arc::new(AccessRequestRepository::new(db_pool.clone()));
        let progress_repo = Arc::new(ProgressRepository::new(db_pool.clone()));
        let notification_repo = Arc::new(NotificationRepository::new(db_pool.clone()));

        let pubsub = Arc::new(MemoryPubSub::new(config.realtime.channel_buffer_size));
        let hub = Arc::new(InvalidationHub::new(pubsub));

        let access_service = Arc::new(AccessService::new(
            course_repo.clone(),
            purchase_repo.clone(),
            request_repo.clone(),
            hub.clone(),
        ));
        let notification_service = Arc::new(NotificationService::new(
            notification_repo.clone(),
            hub.clone(),
        ));
        let request_service = Arc::new(AccessRequestService::new(
            request_repo.clone(),
            course_repo.clone(),
            access_service.clone(),
            notification_service.clone(),
            hub.clone(),
        ));
        let progress_service = Arc::new(ProgressService::new(
            progress_repo,
            course_repo.clone(),
            access_service.clone(),
            hub.clone(),
        ));
        let course_service = Arc::new(CourseService::new(course_repo, access_service.clone()));
        let user_service = Arc::new(UserService::new(
            user_repo,
            password_hasher.clone(),
            jwt_encoder.clone(),
            jwt_decoder.clone(),
        ));

        Self {
            config,
            db_pool,
            jwt_encoder,
            jwt_decoder,
            password_hasher,
            hub,
            user_service,
            course_service,
            access_service,
            request_service,
            progress_service,
            notification_service,
        }
    }
}
