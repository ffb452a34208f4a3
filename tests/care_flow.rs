mod common;

use axum::http::StatusCode;
use serde_json::json;

async fn book_appointment(app: &common::TestApp, token: &str, senior_id: i32) -> i64 {
    let date = (chrono::Utc::now().date_naive() + chrono::Duration::days(4)).to_string();
    let (status, body) = app
        .post(
            "/appointments",
            token,
            json!({
                "senior_id": senior_id,
                "title": "Physiotherapy",
                "appointment_type": "medical",
                "appointment_date": date,
                "appointment_time": "10:15:00",
                "location": "Riverside practice",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["status"], "scheduled");
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn appointments_confirm_then_complete_and_closed_ones_stay_closed() {
    let app = common::spawn_app().await;
    let (margaret_id, margaret) = app.register("margaret", "senior").await;
    let id = book_appointment(&app, &margaret, margaret_id).await;

    let (status, body) = app
        .post_empty(&format!("/appointments/{id}/confirm"), &margaret)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "confirmed");

    let (status, body) = app
        .post_empty(&format!("/appointments/{id}/complete"), &margaret)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");

    // A completed appointment cannot be confirmed or completed again.
    let (status, body) = app
        .post_empty(&format!("/appointments/{id}/confirm"), &margaret)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
    let (status, _) = app
        .post_empty(&format!("/appointments/{id}/complete"), &margaret)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, current) = app.get(&format!("/appointments/{id}"), &margaret).await;
    assert_eq!(current["status"], "completed");
}

#[tokio::test]
async fn cancelled_appointments_reject_transitions_and_bad_statuses_reject_outright() {
    let app = common::spawn_app().await;
    let (margaret_id, margaret) = app.register("margaret", "senior").await;
    let id = book_appointment(&app, &margaret, margaret_id).await;

    let (status, body) = app
        .patch(
            &format!("/appointments/{id}"),
            &margaret,
            json!({"status": "postponed-ish"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");

    let (status, body) = app
        .patch(
            &format!("/appointments/{id}"),
            &margaret,
            json!({"status": "cancelled"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cancelled");

    let (status, _) = app
        .post_empty(&format!("/appointments/{id}/confirm"), &margaret)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn medication_logs_mark_taken_exactly_once() {
    let app = common::spawn_app().await;
    let (margaret_id, margaret) = app.register("margaret", "senior").await;
    let (frank_id, frank) = app.register("frank", "caretaker").await;

    let today = chrono::Utc::now().date_naive();
    let (status, med) = app
        .post(
            "/medications",
            &margaret,
            json!({
                "senior_id": margaret_id,
                "medication_name": "Metformin",
                "dosage": "500mg",
                "frequency": "twice_daily",
                "time_of_day": "Morning and night",
                "start_date": today.to_string(),
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{med}");
    let med_id = med["id"].as_i64().unwrap();

    let (status, log) = app
        .post(
            "/medication-logs",
            &margaret,
            json!({
                "medication_id": med_id,
                "scheduled_time": format!("{today}T08:00:00"),
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{log}");
    assert_eq!(log["was_taken"], false);
    assert_eq!(log["medication_name"], "Metformin");
    let log_id = log["id"].as_i64().unwrap();

    // The caretaker confirms the dose.
    let (status, body) = app
        .post_empty(&format!("/medication-logs/{log_id}/mark-taken"), &frank)
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["was_taken"], true);
    assert_eq!(body["confirmed_by"].as_i64().unwrap() as i32, frank_id);
    assert!(!body["actual_time"].is_null());

    let (status, body) = app
        .post_empty(&format!("/medication-logs/{log_id}/mark-taken"), &frank)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn medication_logs_require_an_existing_medication() {
    let app = common::spawn_app().await;
    let (_, margaret) = app.register("margaret", "senior").await;

    let (status, body) = app
        .post(
            "/medication-logs",
            &margaret,
            json!({"medication_id": 41, "scheduled_time": "2026-08-25T08:00:00"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");
}
