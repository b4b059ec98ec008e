//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use coursehub_api::router::build_router;
use coursehub_api::state::AppState;
use coursehub_auth::password::hasher::PasswordHasher;
use coursehub_core::config::AppConfig;
use coursehub_database::connection::DatabasePool;
use coursehub_database::migration::run_migrations;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Database pool for direct queries
    pub db_pool: PgPool,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        let mut config = AppConfig::load("test").expect("Failed to load test config");
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database.url = url;
        }

        let db = DatabasePool::connect(&config.database)
            .await
            .expect("Failed to connect to test database");

        run_migrations(db.pool())
            .await
            .expect("Failed to run migrations");

        let db_pool = db.into_pool();
        Self::clean_database(&db_pool).await;

        let state = AppState::build(Arc::new(config.clone()), db_pool.clone());
        let router = build_router(state);

        Self {
            router,
            db_pool,
            config,
        }
    }

    /// Clean all test data from the database
    async fn clean_database(pool: &PgPool) {
        let tables = [
            "notifications",
            "lecture_progress",
            "course_completions",
            "purchase_records",
            "access_requests",
            "course_enrollments",
            "lectures",
            "courses",
            "users",
        ];

        for table in &tables {
            let query = format!("DELETE FROM {}", table);
            let _ = sqlx::query(&query).execute(pool).await;
        }
    }

    /// Create a test user and return their ID
    pub async fn create_test_user(&self, username: &str, password: &str, role: &str) -> Uuid {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password(password).expect("Failed to hash password");
        let id = Uuid::new_v4();

        sqlx::query(
            r#"INSERT INTO users (id, username, email, password_hash, role, is_active, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5::user_role, TRUE, NOW(), NOW())"#,
        )
        .bind(id)
        .bind(username)
        .bind(format!("{}@test.com", username))
        .bind(&hash)
        .bind(role)
        .execute(&self.db_pool)
        .await
        .expect("Failed to create test user");

        id
    }

    /// Create a course and return its ID. `price = None` means free.
    pub async fn create_course(
        &self,
        instructor_id: Uuid,
        title: &str,
        price: Option<&str>,
    ) -> Uuid {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"INSERT INTO courses (id, title, description, instructor_id, price, is_published, created_at, updated_at)
               VALUES ($1, $2, 'a test course', $3, $4, TRUE, NOW(), NOW())"#,
        )
        .bind(id)
        .bind(title)
        .bind(instructor_id)
        .bind(price)
        .execute(&self.db_pool)
        .await
        .expect("Failed to create test course");

        id
    }

    /// Add a lecture to a course and return its ID
    pub async fn create_lecture(&self, course_id: Uuid, position: i32, preview_free: bool) -> Uuid {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"INSERT INTO lectures (id, course_id, title, video_ref, preview_free, position, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, NOW())"#,
        )
        .bind(id)
        .bind(course_id)
        .bind(format!("Lecture {}", position))
        .bind(format!("videos/{}.mp4", id))
        .bind(preview_free)
        .bind(position)
        .execute(&self.db_pool)
        .await
        .expect("Failed to create test lecture");

        id
    }

    /// Enroll a user in a course directly
    pub async fn enroll(&self, user_id: Uuid, course_id: Uuid) {
        sqlx::query(
            r#"INSERT INTO course_enrollments (course_id, user_id, created_at)
               VALUES ($1, $2, NOW())"#,
        )
        .bind(course_id)
        .bind(user_id)
        .execute(&self.db_pool)
        .await
        .expect("Failed to enroll test user");
    }

    /// Login and return JWT access token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let body = serde_json::json!({
            "username": username,
            "password": password,
        });

        let response = self
            .request("POST", "/api/auth/login", Some(body), None)
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response.body["data"]["access_token"]
            .as_str()
            .expect("No access_token in login response")
            .to_string()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
