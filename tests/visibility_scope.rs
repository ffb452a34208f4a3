mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

fn ids(list: &Value) -> Vec<i64> {
    list.as_array()
        .expect("array body")
        .iter()
        .map(|row| row["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn appointments_are_scoped_per_role() {
    let app = common::spawn_app().await;
    let (margaret_id, margaret) = app.register("margaret", "senior").await;
    let (ruth_id, ruth) = app.register("ruth", "senior").await;
    let (frank_id, frank) = app.register("frank", "caretaker").await;
    let (_, volunteer) = app.register("dev", "volunteer").await;
    let (_, admin) = app.register("dispatch", "senior_admin").await;

    let date = (chrono::Utc::now().date_naive() + chrono::Duration::days(3)).to_string();
    let (status, a) = app
        .post(
            "/appointments",
            &frank,
            json!({
                "senior_id": margaret_id,
                "caretaker_id": frank_id,
                "title": "Cardiology check-up",
                "appointment_type": "medical",
                "appointment_date": date,
                "appointment_time": "09:30:00",
                "location": "Mercy Clinic",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{a}");
    let appointment_a = a["id"].as_i64().unwrap();

    let (status, b) = app
        .post(
            "/appointments",
            &admin,
            json!({
                "senior_id": ruth_id,
                "title": "Eye exam",
                "appointment_type": "medical",
                "appointment_date": date,
                "appointment_time": "14:00:00",
                "location": "Vista Optometry",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{b}");
    let appointment_b = b["id"].as_i64().unwrap();

    // Each senior sees exactly their own rows.
    let (_, list) = app.get("/appointments", &margaret).await;
    assert_eq!(ids(&list), vec![appointment_a]);
    let (_, list) = app.get("/appointments", &ruth).await;
    assert_eq!(ids(&list), vec![appointment_b]);

    // The caretaker sees the appointment they are attached to.
    let (_, list) = app.get("/appointments", &frank).await;
    assert_eq!(ids(&list), vec![appointment_a]);

    // Volunteers see no appointments at all; admins see everything.
    let (_, list) = app.get("/appointments", &volunteer).await;
    assert!(list.as_array().unwrap().is_empty());
    let (_, list) = app.get("/appointments", &admin).await;
    assert_eq!(ids(&list).len(), 2);

    // A row outside the caller's scope reads as missing, not forbidden.
    let (status, body) = app
        .get(&format!("/appointments/{appointment_b}"), &margaret)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
    let (status, _) = app
        .get(&format!("/appointments/{appointment_a}"), &admin)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn medications_are_visible_to_their_senior_and_admins_only() {
    let app = common::spawn_app().await;
    let (margaret_id, margaret) = app.register("margaret", "senior").await;
    let (_, ruth) = app.register("ruth", "senior").await;
    let (_, frank) = app.register("frank", "caretaker").await;
    let (_, admin) = app.register("dispatch", "senior_admin").await;

    let (status, med) = app
        .post(
            "/medications",
            &admin,
            json!({
                "senior_id": margaret_id,
                "medication_name": "Lisinopril",
                "dosage": "10mg",
                "frequency": "daily",
                "time_of_day": "Morning",
                "start_date": chrono::Utc::now().date_naive().to_string(),
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{med}");
    let med_id = med["id"].as_i64().unwrap();

    let (_, list) = app.get("/medications", &margaret).await;
    assert_eq!(ids(&list), vec![med_id]);
    let (_, list) = app.get("/medications", &ruth).await;
    assert!(list.as_array().unwrap().is_empty());
    let (_, list) = app.get("/medications", &frank).await;
    assert!(list.as_array().unwrap().is_empty());

    let (status, _) = app.get(&format!("/medications/{med_id}"), &ruth).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get(&format!("/medications/{med_id}"), &admin).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn notifications_stay_private_to_their_addressee_even_for_admins() {
    let app = common::spawn_app().await;
    let (margaret_id, margaret) = app.register("margaret", "senior").await;
    let (_, ruth) = app.register("ruth", "senior").await;
    let (_, admin) = app.register("dispatch", "senior_admin").await;

    let (status, created) = app
        .post(
            "/notifications",
            &admin,
            json!({
                "user_id": margaret_id,
                "title": "Appointment reminder",
                "message": "Cardiology tomorrow at 09:30",
                "notification_type": "reminder",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    let notification_id = created["id"].as_i64().unwrap();

    let (_, list) = app.get("/notifications", &margaret).await;
    assert_eq!(ids(&list), vec![notification_id]);

    // The sender does not see it in their own feed, and other users cannot
    // fetch it by id.
    let (_, list) = app.get("/notifications", &admin).await;
    assert!(list.as_array().unwrap().is_empty());
    let (status, _) = app
        .get(&format!("/notifications/{notification_id}"), &ruth)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
