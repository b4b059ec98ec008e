//! Integration tests for resolution notifications.

use http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_decline_notifies_the_student() {
    let app = TestApp::new().await;
    let instructor = app
        .create_test_user("teach", "password123", "instructor")
        .await;
    let course = app.create_course(instructor, "Paid", Some("49.99")).await;
    app.create_test_user("student1", "password123", "student")
        .await;
    app.create_test_user("admin1", "password123", "admin").await;
    let student_token = app.login("student1", "password123").await;
    let admin_token = app.login("admin1", "password123").await;

    let submitted = app
        .request(
            "POST",
            &format!("/api/courses/{}/access-requests", course),
            None,
            Some(&student_token),
        )
        .await;
    let request_id = submitted.body["data"]["id"].as_str().expect("request id");

    app.request(
        "PUT",
        &format!("/api/admin/access-requests/{}/decline", request_id),
        Some(serde_json::json!({ "reason": "No payment found" })),
        Some(&admin_token),
    )
    .await;

    let unread = app
        .request(
            "GET",
            "/api/notifications/unread-count",
            None,
            Some(&student_token),
        )
        .await;
    assert_eq!(unread.status, StatusCode::OK);
    assert_eq!(unread.body["data"]["count"], 1);

    let listed = app
        .request("GET", "/api/notifications", None, Some(&student_token))
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    let items = listed.body["data"]["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["category"], "request_declined");
    assert_eq!(items[0]["is_read"], false);
    let body = items[0]["body"].as_str().expect("body");
    assert!(body.contains("No payment found"), "body was: {body}");

    let id = items[0]["id"].as_str().expect("notification id");
    let marked = app
        .request(
            "PUT",
            &format!("/api/notifications/{}/read", id),
            None,
            Some(&student_token),
        )
        .await;
    assert_eq!(marked.status, StatusCode::OK);
    assert_eq!(marked.body["data"]["is_read"], true);

    let unread_after = app
        .request(
            "GET",
            "/api/notifications/unread-count",
            None,
            Some(&student_token),
        )
        .await;
    assert_eq!(unread_after.body["data"]["count"], 0);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_approval_notification_category() {
    let app = TestApp::new().await;
    let instructor = app
        .create_test_user("teach", "password123", "instructor")
        .await;
    let course = app.create_course(instructor, "Paid", Some("49.99")).await;
    app.create_test_user("student1", "password123", "student")
        .await;
    app.create_test_user("admin1", "password123", "admin").await;
    let student_token = app.login("student1", "password123").await;
    let admin_token = app.login("admin1", "password123").await;

    let submitted = app
        .request(
            "POST",
            &format!("/api/courses/{}/access-requests", course),
            None,
            Some(&student_token),
        )
        .await;
    let request_id = submitted.body["data"]["id"].as_str().expect("request id");

    app.request(
        "PUT",
        &format!("/api/admin/access-requests/{}/approve", request_id),
        None,
        Some(&admin_token),
    )
    .await;

    let listed = app
        .request("GET", "/api/notifications", None, Some(&student_token))
        .await;
    let items = listed.body["data"]["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["category"], "request_approved");
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_cannot_read_another_users_notification() {
    let app = TestApp::new().await;
    let instructor = app
        .create_test_user("teach", "password123", "instructor")
        .await;
    let course = app.create_course(instructor, "Paid", Some("49.99")).await;
    app.create_test_user("student1", "password123", "student")
        .await;
    app.create_test_user("student2", "password123", "student")
        .await;
    app.create_test_user("admin1", "password123", "admin").await;
    let student_token = app.login("student1", "password123").await;
    let other_token = app.login("student2", "password123").await;
    let admin_token = app.login("admin1", "password123").await;

    let submitted = app
        .request(
            "POST",
            &format!("/api/courses/{}/access-requests", course),
            None,
            Some(&student_token),
        )
        .await;
    let request_id = submitted.body["data"]["id"].as_str().expect("request id");
    app.request(
        "PUT",
        &format!("/api/admin/access-requests/{}/approve", request_id),
        None,
        Some(&admin_token),
    )
    .await;

    let listed = app
        .request("GET", "/api/notifications", None, Some(&student_token))
        .await;
    let id = listed.body["data"]["items"][0]["id"]
        .as_str()
        .expect("notification id");

    let response = app
        .request(
            "PUT",
            &format!("/api/notifications/{}/read", id),
            None,
            Some(&other_token),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
