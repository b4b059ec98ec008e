//! Integration tests for the access-request lifecycle.

use http::StatusCode;

use crate::helpers::TestApp;

async fn setup() -> (TestApp, uuid::Uuid, String, String) {
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
    (app, course, student_token, admin_token)
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_submit_creates_pending_request() {
    let (app, course, student_token, _) = setup().await;

    let response = app
        .request(
            "POST",
            &format!("/api/courses/{}/access-requests", course),
            None,
            Some(&student_token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    assert_eq!(response.body["data"]["status"], "pending");

    let decision = app
        .request(
            "GET",
            &format!("/api/courses/{}/access", course),
            None,
            Some(&student_token),
        )
        .await;
    assert_eq!(decision.body["data"]["decision"], "pending");
    assert!(decision.body["data"]["poll_interval_seconds"].is_u64());
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_duplicate_submit_is_conflict() {
    let (app, course, student_token, _) = setup().await;

    let first = app
        .request(
            "POST",
            &format!("/api/courses/{}/access-requests", course),
            None,
            Some(&student_token),
        )
        .await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = app
        .request(
            "POST",
            &format!("/api/courses/{}/access-requests", course),
            None,
            Some(&student_token),
        )
        .await;

    assert_eq!(second.status, StatusCode::CONFLICT);
    let message = second.body["message"].as_str().expect("error message");
    assert!(message.contains("pending"), "message was: {message}");
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_approve_grants_access_and_records_purchase() {
    let (app, course, student_token, admin_token) = setup().await;

    let submitted = app
        .request(
            "POST",
            &format!("/api/courses/{}/access-requests", course),
            None,
            Some(&student_token),
        )
        .await;
    let request_id = submitted.body["data"]["id"].as_str().expect("request id");

    let approved = app
        .request(
            "PUT",
            &format!("/api/admin/access-requests/{}/approve", request_id),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(approved.status, StatusCode::OK, "{:?}", approved.body);
    assert_eq!(approved.body["data"]["status"], "approved");

    let decision = app
        .request(
            "GET",
            &format!("/api/courses/{}/access", course),
            None,
            Some(&student_token),
        )
        .await;
    assert_eq!(decision.body["data"]["decision"], "granted");
    assert_eq!(decision.body["data"]["reason"], "purchased");

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM purchase_records WHERE course_id = $1")
            .bind(course)
            .fetch_one(&app.db_pool)
            .await
            .expect("count purchases");
    assert_eq!(count, 1);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_decline_then_resubmit() {
    let (app, course, student_token, admin_token) = setup().await;

    let submitted = app
        .request(
            "POST",
            &format!("/api/courses/{}/access-requests", course),
            None,
            Some(&student_token),
        )
        .await;
    let request_id = submitted.body["data"]["id"].as_str().expect("request id");

    let declined = app
        .request(
            "PUT",
            &format!("/api/admin/access-requests/{}/decline", request_id),
            Some(serde_json::json!({ "reason": "No payment found" })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(declined.status, StatusCode::OK, "{:?}", declined.body);
    assert_eq!(declined.body["data"]["status"], "declined");
    assert_eq!(declined.body["data"]["decline_reason"], "No payment found");

    // A declined request does not block access outright, and does not
    // block a new submission either.
    let decision = app
        .request(
            "GET",
            &format!("/api/courses/{}/access", course),
            None,
            Some(&student_token),
        )
        .await;
    assert_eq!(decision.body["data"]["decision"], "denied");

    let resubmitted = app
        .request(
            "POST",
            &format!("/api/courses/{}/access-requests", course),
            None,
            Some(&student_token),
        )
        .await;
    assert_eq!(resubmitted.status, StatusCode::CREATED);
    assert_eq!(resubmitted.body["data"]["status"], "pending");
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_decline_requires_reason() {
    let (app, course, student_token, admin_token) = setup().await;

    let submitted = app
        .request(
            "POST",
            &format!("/api/courses/{}/access-requests", course),
            None,
            Some(&student_token),
        )
        .await;
    let request_id = submitted.body["data"]["id"].as_str().expect("request id");

    let response = app
        .request(
            "PUT",
            &format!("/api/admin/access-requests/{}/decline", request_id),
            Some(serde_json::json!({ "reason": "   " })),
            Some(&admin_token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_resolving_twice_is_conflict() {
    let (app, course, student_token, admin_token) = setup().await;

    let submitted = app
        .request(
            "POST",
            &format!("/api/courses/{}/access-requests", course),
            None,
            Some(&student_token),
        )
        .await;
    let request_id = submitted.body["data"]["id"].as_str().expect("request id");

    let approve = format!("/api/admin/access-requests/{}/approve", request_id);
    let first = app.request("PUT", &approve, None, Some(&admin_token)).await;
    assert_eq!(first.status, StatusCode::OK);

    let second = app.request("PUT", &approve, None, Some(&admin_token)).await;
    assert_eq!(second.status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_concurrent_approves_have_one_winner() {
    let (app, course, student_token, admin_token) = setup().await;

    let submitted = app
        .request(
            "POST",
            &format!("/api/courses/{}/access-requests", course),
            None,
            Some(&student_token),
        )
        .await;
    let request_id = submitted.body["data"]["id"].as_str().expect("request id");
    let approve = format!("/api/admin/access-requests/{}/approve", request_id);

    let (first, second) = tokio::join!(
        app.request("PUT", &approve, None, Some(&admin_token)),
        app.request("PUT", &approve, None, Some(&admin_token)),
    );

    let statuses = [first.status, second.status];
    assert_eq!(
        statuses.iter().filter(|s| **s == StatusCode::OK).count(),
        1,
        "exactly one approve wins: {statuses:?}"
    );
    assert_eq!(
        statuses
            .iter()
            .filter(|s| **s == StatusCode::CONFLICT)
            .count(),
        1,
        "the loser sees a conflict: {statuses:?}"
    );

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM purchase_records WHERE course_id = $1")
            .bind(course)
            .fetch_one(&app.db_pool)
            .await
            .expect("count purchases");
    assert_eq!(count, 1);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_non_admin_cannot_resolve() {
    let (app, course, student_token, _) = setup().await;

    let submitted = app
        .request(
            "POST",
            &format!("/api/courses/{}/access-requests", course),
            None,
            Some(&student_token),
        )
        .await;
    let request_id = submitted.body["data"]["id"].as_str().expect("request id");

    let response = app
        .request(
            "PUT",
            &format!("/api/admin/access-requests/{}/approve", request_id),
            None,
            Some(&student_token),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_delete_request_clears_pending_state() {
    let (app, course, student_token, admin_token) = setup().await;

    let submitted = app
        .request(
            "POST",
            &format!("/api/courses/{}/access-requests", course),
            None,
            Some(&student_token),
        )
        .await;
    let request_id = submitted.body["data"]["id"].as_str().expect("request id");

    let deleted = app
        .request(
            "DELETE",
            &format!("/api/admin/access-requests/{}", request_id),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let decision = app
        .request(
            "GET",
            &format!("/api/courses/{}/access", course),
            None,
            Some(&student_token),
        )
        .await;
    assert_eq!(decision.body["data"]["decision"], "denied");
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_admin_listing_filters_by_status() {
    let (app, course, student_token, admin_token) = setup().await;

    app.request(
        "POST",
        &format!("/api/courses/{}/access-requests", course),
        None,
        Some(&student_token),
    )
    .await;

    let listed = app
        .request(
            "GET",
            "/api/admin/access-requests?status=pending",
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(listed.status, StatusCode::OK, "{:?}", listed.body);
    assert_eq!(listed.body["data"]["total"], 1);

    let count = app
        .request(
            "GET",
            "/api/admin/access-requests/pending-count",
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(count.body["data"]["count"], 1);
}
