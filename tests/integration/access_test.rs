//! Integration tests for the access decision and free enrollment.

use http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_free_course_is_granted_without_evidence() {
    let app = TestApp::new().await;
    let instructor = app.create_test_user("teach", "password123", "instructor").await;
    let course = app.create_course(instructor, "Intro", None).await;
    app.create_test_user("student1", "password123", "student")
        .await;
    let token = app.login("student1", "password123").await;

    let response = app
        .request(
            "GET",
            &format!("/api/courses/{}/access", course),
            None,
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["decision"], "granted");
    assert_eq!(response.body["data"]["reason"], "free course");
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_paid_course_without_evidence_is_denied() {
    let app = TestApp::new().await;
    let instructor = app.create_test_user("teach", "password123", "instructor").await;
    let course = app.create_course(instructor, "Paid", Some("49.99")).await;
    app.create_test_user("student1", "password123", "student")
        .await;
    let token = app.login("student1", "password123").await;

    let response = app
        .request(
            "GET",
            &format!("/api/courses/{}/access", course),
            None,
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["decision"], "denied");
    assert!(response.body["data"]["poll_interval_seconds"].is_null());
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_enrollment_grants_access() {
    let app = TestApp::new().await;
    let instructor = app.create_test_user("teach", "password123", "instructor").await;
    let course = app.create_course(instructor, "Paid", Some("49.99")).await;
    let student = app
        .create_test_user("student1", "password123", "student")
        .await;
    app.enroll(student, course).await;
    let token = app.login("student1", "password123").await;

    let response = app
        .request(
            "GET",
            &format!("/api/courses/{}/access", course),
            None,
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["decision"], "granted");
    assert_eq!(response.body["data"]["reason"], "enrolled");
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_enroll_free_on_free_course() {
    let app = TestApp::new().await;
    let instructor = app.create_test_user("teach", "password123", "instructor").await;
    let course = app.create_course(instructor, "Intro", Some("0")).await;
    app.create_test_user("student1", "password123", "student")
        .await;
    let token = app.login("student1", "password123").await;

    let response = app
        .request(
            "POST",
            &format!("/api/courses/{}/enroll-free", course),
            None,
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    assert_eq!(response.body["data"]["source"], "free_enrollment");
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_enroll_free_rejected_for_paid_course() {
    let app = TestApp::new().await;
    let instructor = app.create_test_user("teach", "password123", "instructor").await;
    let course = app.create_course(instructor, "Paid", Some("49.99")).await;
    app.create_test_user("student1", "password123", "student")
        .await;
    let token = app.login("student1", "password123").await;

    let response = app
        .request(
            "POST",
            &format!("/api/courses/{}/enroll-free", course),
            None,
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_admin_recorded_purchase_grants_access() {
    let app = TestApp::new().await;
    let instructor = app.create_test_user("teach", "password123", "instructor").await;
    let course = app.create_course(instructor, "Paid", Some("49.99")).await;
    let student = app
        .create_test_user("student1", "password123", "student")
        .await;
    app.create_test_user("admin1", "password123", "admin").await;
    let admin_token = app.login("admin1", "password123").await;

    let response = app
        .request(
            "POST",
            &format!("/api/admin/courses/{}/purchases", course),
            Some(serde_json::json!({
                "user_id": student,
                "reference": "txn-0001",
            })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let student_token = app.login("student1", "password123").await;
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
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_access_for_unknown_course_is_not_found() {
    let app = TestApp::new().await;
    app.create_test_user("student1", "password123", "student")
        .await;
    let token = app.login("student1", "password123").await;

    let response = app
        .request(
            "GET",
            &format!("/api/courses/{}/access", uuid::Uuid::new_v4()),
            None,
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_lecture_video_refs_are_gated() {
    let app = TestApp::new().await;
    let instructor = app.create_test_user("teach", "password123", "instructor").await;
    let course = app.create_course(instructor, "Paid", Some("49.99")).await;
    app.create_lecture(course, 1, true).await;
    app.create_lecture(course, 2, false).await;
    app.create_test_user("student1", "password123", "student")
        .await;
    let token = app.login("student1", "password123").await;

    let response = app
        .request(
            "GET",
            &format!("/api/courses/{}", course),
            None,
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let lectures = response.body["data"]["lectures"]
        .as_array()
        .expect("lectures array");
    assert_eq!(lectures.len(), 2);
    // Preview lecture keeps its video reference, the gated one loses it.
    assert!(lectures[0]["video_ref"].is_string());
    assert!(lectures[1].get("video_ref").is_none());
}
