mod common;

use axum::http::StatusCode;
use serde_json::json;

async fn notify(app: &common::TestApp, token: &str, user_id: i32, title: &str) -> i64 {
    let (status, body) = app
        .post(
            "/notifications",
            token,
            json!({
                "user_id": user_id,
                "title": title,
                "message": "See the care plan for details",
                "notification_type": "update",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn mark_read_is_idempotent_and_mark_unread_reverses_it() {
    let app = common::spawn_app().await;
    let (margaret_id, margaret) = app.register("margaret", "senior").await;
    let (_, admin) = app.register("dispatch", "senior_admin").await;

    let id = notify(&app, &admin, margaret_id, "Appointment booked").await;

    let (status, body) = app
        .post_empty(&format!("/notifications/{id}/mark-read"), &margaret)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_read"], true);
    let read_at = body["read_at"].clone();
    assert!(!read_at.is_null());

    // Marking again is a no-op, not an error.
    let (status, body) = app
        .post_empty(&format!("/notifications/{id}/mark-read"), &margaret)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["read_at"], read_at);

    let (status, body) = app
        .post_empty(&format!("/notifications/{id}/mark-unread"), &margaret)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_read"], false);
    assert!(body["read_at"].is_null());

    let (_, unread) = app.get("/notifications/unread", &margaret).await;
    assert_eq!(unread.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn mark_all_read_only_touches_the_callers_feed() {
    let app = common::spawn_app().await;
    let (margaret_id, margaret) = app.register("margaret", "senior").await;
    let (ruth_id, ruth) = app.register("ruth", "senior").await;
    let (_, admin) = app.register("dispatch", "senior_admin").await;

    notify(&app, &admin, margaret_id, "Medication refill due").await;
    notify(&app, &admin, margaret_id, "Event this weekend").await;
    notify(&app, &admin, ruth_id, "New caretaker assigned").await;

    let (status, body) = app
        .post_empty("/notifications/mark-all-read", &margaret)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 2);

    let (_, unread) = app.get("/notifications/unread", &margaret).await;
    assert!(unread.as_array().unwrap().is_empty());

    // Ruth's feed is untouched.
    let (_, unread) = app.get("/notifications/unread", &ruth).await;
    assert_eq!(unread.as_array().unwrap().len(), 1);

    // Running it again finds nothing left to update.
    let (_, body) = app
        .post_empty("/notifications/mark-all-read", &margaret)
        .await;
    assert_eq!(body["updated"], 0);
}

#[tokio::test]
async fn marking_someone_elses_notification_reads_as_missing() {
    let app = common::spawn_app().await;
    let (margaret_id, _) = app.register("margaret", "senior").await;
    let (_, ruth) = app.register("ruth", "senior").await;
    let (_, admin) = app.register("dispatch", "senior_admin").await;

    let id = notify(&app, &admin, margaret_id, "Private reminder").await;

    let (status, body) = app
        .post_empty(&format!("/notifications/{id}/mark-read"), &ruth)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn notifications_for_a_missing_user_are_rejected() {
    let app = common::spawn_app().await;
    let (_, admin) = app.register("dispatch", "senior_admin").await;

    let (status, body) = app
        .post(
            "/notifications",
            &admin,
            json!({
                "user_id": 9999,
                "title": "Orphan",
                "message": "No such addressee",
                "notification_type": "update",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");
}
