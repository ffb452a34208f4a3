mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

async fn stats(app: &common::TestApp, token: &str) -> Value {
    let (status, body) = app.get("/dashboard/stats", token).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body
}

#[tokio::test]
async fn senior_dashboard_counts_their_own_care_items() {
    let app = common::spawn_app().await;
    let (margaret_id, margaret) = app.register("margaret", "senior").await;
    let (_, admin) = app.register("dispatch", "senior_admin").await;

    let today = chrono::Utc::now().date_naive();
    let upcoming = (today + chrono::Duration::days(2)).to_string();
    for (title, time) in [("Cardiology", "09:00:00"), ("Dental", "11:00:00")] {
        let (status, _) = app
            .post(
                "/appointments",
                &admin,
                json!({
                    "senior_id": margaret_id,
                    "title": title,
                    "appointment_type": "medical",
                    "appointment_date": upcoming,
                    "appointment_time": time,
                    "location": "Mercy Clinic",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // A completed appointment drops out of the upcoming count.
    let (_, list) = app.get("/appointments", &margaret).await;
    let first = list[0]["id"].as_i64().unwrap();
    let (status, _) = app
        .post_empty(&format!("/appointments/{first}/complete"), &margaret)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post(
            "/medications",
            &admin,
            json!({
                "senior_id": margaret_id,
                "medication_name": "Lisinopril",
                "dosage": "10mg",
                "frequency": "daily",
                "time_of_day": "Morning",
                "start_date": today.to_string(),
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .post(
            "/notifications",
            &admin,
            json!({
                "user_id": margaret_id,
                "title": "Welcome",
                "message": "Your care plan is ready",
                "notification_type": "update",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let body = stats(&app, &margaret).await;
    assert_eq!(
        body,
        json!({
            "upcoming_appointments": 1,
            "active_medications": 1,
            "unread_notifications": 1,
        })
    );
}

#[tokio::test]
async fn caretaker_dashboard_counts_assignments_and_todays_appointments() {
    let app = common::spawn_app().await;
    let (margaret_id, _) = app.register("margaret", "senior").await;
    let (frank_id, frank) = app.register("frank", "caretaker").await;

    let today = chrono::Utc::now().date_naive();
    let (status, _) = app
        .post(
            "/care-assignments",
            &frank,
            json!({
                "senior_id": margaret_id,
                "caretaker_id": frank_id,
                "start_date": today.to_string(),
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .post(
            "/appointments",
            &frank,
            json!({
                "senior_id": margaret_id,
                "caretaker_id": frank_id,
                "title": "Morning visit",
                "appointment_type": "home_visit",
                "appointment_date": today.to_string(),
                "appointment_time": "08:00:00",
                "location": "Home",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let body = stats(&app, &frank).await;
    assert_eq!(
        body,
        json!({
            "assigned_seniors": 1,
            "today_appointments": 1,
            "pending_tasks": 0,
        })
    );
}

#[tokio::test]
async fn volunteer_dashboard_degrades_to_empty_without_a_profile() {
    let app = common::spawn_app().await;
    let (_, volunteer) = app.register("dev", "volunteer").await;
    assert_eq!(stats(&app, &volunteer).await, json!({}));
}

#[tokio::test]
async fn volunteer_dashboard_reports_profile_counters_and_open_tasks() {
    let app = common::spawn_app().await;
    let (margaret_id, _) = app.register("margaret", "senior").await;
    let (volunteer_id, volunteer) = app.register("dev", "volunteer").await;
    let (organizer_id, organizer) = app.register("organizer", "ngo_admin").await;
    let ngo_id = app
        .create_ngo(&organizer, "silverline", Some(organizer_id))
        .await;

    let (status, _) = app
        .post(
            "/volunteers",
            &volunteer,
            json!({"user_id": volunteer_id, "ngo_id": ngo_id, "volunteer_code": "VOL-7"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let date = (chrono::Utc::now().date_naive() + chrono::Duration::days(1)).to_string();
    let (status, _) = app
        .post(
            "/tasks",
            &organizer,
            json!({
                "senior_id": margaret_id,
                "volunteer_id": volunteer_id,
                "ngo_id": ngo_id,
                "title": "Pharmacy run",
                "task_type": "errand",
                "description": "Monthly prescription",
                "scheduled_date": date,
                "scheduled_time": "10:00:00",
                "location": "Corner pharmacy",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let body = stats(&app, &volunteer).await;
    assert_eq!(
        body,
        json!({
            "total_hours": 0.0,
            "seniors_helped": 0,
            "tasks_completed": 0,
            "pending_tasks": 1,
        })
    );
}

#[tokio::test]
async fn senior_admin_dashboard_aggregates_across_the_system() {
    let app = common::spawn_app().await;
    let (margaret_id, margaret) = app.register("margaret", "senior").await;
    app.register("ruth", "senior").await;
    let (frank_id, frank) = app.register("frank", "caretaker").await;
    let (_, admin) = app.register("dispatch", "senior_admin").await;

    let today = chrono::Utc::now().date_naive();
    let (status, _) = app
        .post(
            "/care-assignments",
            &frank,
            json!({
                "senior_id": margaret_id,
                "caretaker_id": frank_id,
                "start_date": today.to_string(),
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .post(
            "/emergency-alerts",
            &margaret,
            json!({"senior_id": margaret_id, "alert_type": "fall"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let body = stats(&app, &admin).await;
    assert_eq!(
        body,
        json!({
            "total_seniors": 2,
            "total_caretakers": 1,
            "active_assignments": 1,
            "active_alerts": 1,
        })
    );
}

#[tokio::test]
async fn ngo_admin_dashboard_is_keyed_to_the_ngo_they_administer() {
    let app = common::spawn_app().await;
    let (margaret_id, _) = app.register("margaret", "senior").await;
    let (volunteer_id, volunteer) = app.register("dev", "volunteer").await;
    let (organizer_id, organizer) = app.register("organizer", "ngo_admin").await;

    // No NGO yet: empty stats rather than an error.
    assert_eq!(stats(&app, &organizer).await, json!({}));

    let ngo_id = app
        .create_ngo(&organizer, "silverline", Some(organizer_id))
        .await;
    let (status, _) = app
        .post(
            "/volunteers",
            &volunteer,
            json!({"user_id": volunteer_id, "ngo_id": ngo_id, "volunteer_code": "VOL-7"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let date = (chrono::Utc::now().date_naive() + chrono::Duration::days(5)).to_string();
    let (status, _) = app
        .post(
            "/tasks",
            &organizer,
            json!({
                "senior_id": margaret_id,
                "volunteer_id": volunteer_id,
                "ngo_id": ngo_id,
                "title": "Companionship visit",
                "task_type": "visit",
                "description": "Afternoon tea and a chat",
                "scheduled_date": date,
                "scheduled_time": "15:00:00",
                "location": "Home",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .post(
            "/events",
            &organizer,
            json!({
                "ngo_id": ngo_id,
                "title": "Community lunch",
                "description": "Monthly lunch",
                "event_type": "social",
                "event_date": date,
                "start_time": "12:00:00",
                "end_time": "14:00:00",
                "venue": "Town hall",
                "address": "1 Main Street",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let body = stats(&app, &organizer).await;
    assert_eq!(
        body,
        json!({
            "total_volunteers": 1,
            "active_tasks": 1,
            "upcoming_events": 1,
        })
    );
}
