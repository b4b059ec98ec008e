//! Integration tests for lecture progress and completion.

use http::StatusCode;
use uuid::Uuid;

use crate::helpers::TestApp;

async fn setup_free_course(app: &TestApp, lecture_count: i32) -> (Uuid, Vec<Uuid>, String) {
    let instructor = app
        .create_test_user("teach", "password123", "instructor")
        .await;
    let course = app.create_course(instructor, "Intro", None).await;
    let mut lectures = Vec::new();
    for position in 1..=lecture_count {
        lectures.push(app.create_lecture(course, position, false).await);
    }
    app.create_test_user("student1", "password123", "student")
        .await;
    let token = app.login("student1", "password123").await;
    (course, lectures, token)
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_viewed_lectures_drive_percentage() {
    let app = TestApp::new().await;
    let (course, lectures, token) = setup_free_course(&app, 2).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/courses/{}/lectures/{}/viewed", course, lectures[0]),
            Some(serde_json::json!({ "viewed": true })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["viewed_count"], 1);
    assert_eq!(response.body["data"]["total_lectures"], 2);
    assert_eq!(response.body["data"]["percentage"], 50);
    assert_eq!(response.body["data"]["completed"], false);

    let full = app
        .request(
            "PUT",
            &format!("/api/courses/{}/lectures/{}/viewed", course, lectures[1]),
            Some(serde_json::json!({ "viewed": true })),
            Some(&token),
        )
        .await;
    assert_eq!(full.body["data"]["percentage"], 100);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_percentage_floors() {
    let app = TestApp::new().await;
    let (course, lectures, token) = setup_free_course(&app, 3).await;

    for lecture in &lectures[..2] {
        app.request(
            "PUT",
            &format!("/api/courses/{}/lectures/{}/viewed", course, lecture),
            Some(serde_json::json!({ "viewed": true })),
            Some(&token),
        )
        .await;
    }

    let response = app
        .request(
            "GET",
            &format!("/api/courses/{}/progress", course),
            None,
            Some(&token),
        )
        .await;

    // 2 of 3 floors to 66, never rounds to 67.
    assert_eq!(response.body["data"]["percentage"], 66);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_unviewing_a_lecture() {
    let app = TestApp::new().await;
    let (course, lectures, token) = setup_free_course(&app, 2).await;

    app.request(
        "PUT",
        &format!("/api/courses/{}/lectures/{}/viewed", course, lectures[0]),
        Some(serde_json::json!({ "viewed": true })),
        Some(&token),
    )
    .await;

    let response = app
        .request(
            "PUT",
            &format!("/api/courses/{}/lectures/{}/viewed", course, lectures[0]),
            Some(serde_json::json!({ "viewed": false })),
            Some(&token),
        )
        .await;

    assert_eq!(response.body["data"]["viewed_count"], 0);
    assert_eq!(response.body["data"]["percentage"], 0);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_playback_threshold_marks_viewed() {
    let app = TestApp::new().await;
    let (course, lectures, token) = setup_free_course(&app, 2).await;

    let below = app
        .request(
            "POST",
            &format!("/api/courses/{}/lectures/{}/playback", course, lectures[0]),
            Some(serde_json::json!({ "played_fraction": 0.5 })),
            Some(&token),
        )
        .await;
    assert_eq!(below.status, StatusCode::OK);
    assert_eq!(below.body["data"]["viewed_count"], 0);

    let above = app
        .request(
            "POST",
            &format!("/api/courses/{}/lectures/{}/playback", course, lectures[0]),
            Some(serde_json::json!({ "played_fraction": 0.97 })),
            Some(&token),
        )
        .await;
    assert_eq!(above.status, StatusCode::OK);
    assert_eq!(above.body["data"]["viewed_count"], 1);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_playback_fraction_out_of_range() {
    let app = TestApp::new().await;
    let (course, lectures, token) = setup_free_course(&app, 1).await;

    let response = app
        .request(
            "POST",
            &format!("/api/courses/{}/lectures/{}/playback", course, lectures[0]),
            Some(serde_json::json!({ "played_fraction": 1.5 })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_completed_override_is_independent() {
    let app = TestApp::new().await;
    let (course, _, token) = setup_free_course(&app, 2).await;

    let complete = app
        .request(
            "PUT",
            &format!("/api/courses/{}/complete", course),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(complete.status, StatusCode::OK);
    assert_eq!(complete.body["data"]["completed"], true);
    // The override does not pretend lectures were watched.
    assert_eq!(complete.body["data"]["percentage"], 0);

    let incomplete = app
        .request(
            "PUT",
            &format!("/api/courses/{}/incomplete", course),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(incomplete.body["data"]["completed"], false);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_unviewing_survives_completed_override() {
    let app = TestApp::new().await;
    let (course, lectures, token) = setup_free_course(&app, 2).await;

    app.request(
        "PUT",
        &format!("/api/courses/{}/lectures/{}/viewed", course, lectures[0]),
        Some(serde_json::json!({ "viewed": true })),
        Some(&token),
    )
    .await;
    app.request(
        "PUT",
        &format!("/api/courses/{}/complete", course),
        None,
        Some(&token),
    )
    .await;

    let response = app
        .request(
            "PUT",
            &format!("/api/courses/{}/lectures/{}/viewed", course, lectures[0]),
            Some(serde_json::json!({ "viewed": false })),
            Some(&token),
        )
        .await;

    // Un-viewing only moves the percentage; the explicit override stands.
    assert_eq!(response.body["data"]["percentage"], 0);
    assert_eq!(response.body["data"]["completed"], true);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_deleted_lecture_rows_are_pruned() {
    let app = TestApp::new().await;
    let (course, lectures, token) = setup_free_course(&app, 2).await;

    for lecture in &lectures {
        app.request(
            "PUT",
            &format!("/api/courses/{}/lectures/{}/viewed", course, lecture),
            Some(serde_json::json!({ "viewed": true })),
            Some(&token),
        )
        .await;
    }

    sqlx::query("DELETE FROM lectures WHERE id = $1")
        .bind(lectures[1])
        .execute(&app.db_pool)
        .await
        .expect("delete lecture");

    let response = app
        .request(
            "GET",
            &format!("/api/courses/{}/progress", course),
            None,
            Some(&token),
        )
        .await;

    assert_eq!(response.body["data"]["viewed_count"], 1);
    assert_eq!(response.body["data"]["total_lectures"], 1);
    assert_eq!(response.body["data"]["percentage"], 100);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_progress_requires_granted_access() {
    let app = TestApp::new().await;
    let instructor = app
        .create_test_user("teach", "password123", "instructor")
        .await;
    let course = app.create_course(instructor, "Paid", Some("49.99")).await;
    let lecture = app.create_lecture(course, 1, false).await;
    app.create_test_user("student1", "password123", "student")
        .await;
    let token = app.login("student1", "password123").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/courses/{}/lectures/{}/viewed", course, lecture),
            Some(serde_json::json!({ "viewed": true })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}
