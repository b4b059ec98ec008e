//! Integration tests for authentication flow.

use http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_login_success() {
    let app = TestApp::new().await;
    app.create_test_user("student1", "password123", "student")
        .await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "username": "student1",
                "password": "password123",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["data"]["access_token"].is_string());
    assert!(response.body["data"]["refresh_token"].is_string());
    assert_eq!(response.body["data"]["user"]["username"], "student1");
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_login_wrong_password() {
    let app = TestApp::new().await;
    app.create_test_user("student1", "password123", "student")
        .await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "username": "student1",
                "password": "wrong",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_register_then_login() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({
                "username": "newstudent",
                "email": "newstudent@test.com",
                "password": "password123",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let token = app.login("newstudent", "password123").await;
    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;

    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["data"]["username"], "newstudent");
    assert_eq!(me.body["data"]["role"], "student");
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_register_duplicate_username() {
    let app = TestApp::new().await;
    app.create_test_user("taken", "password123", "student").await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({
                "username": "taken",
                "email": "other@test.com",
                "password": "password123",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_refresh_returns_new_access_token() {
    let app = TestApp::new().await;
    app.create_test_user("student1", "password123", "student")
        .await;

    let login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "username": "student1",
                "password": "password123",
            })),
            None,
        )
        .await;
    let refresh_token = login.body["data"]["refresh_token"]
        .as_str()
        .expect("No refresh_token")
        .to_string();

    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(serde_json::json!({ "refresh_token": refresh_token })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["data"]["access_token"].is_string());
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_me_requires_token() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/auth/me", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
