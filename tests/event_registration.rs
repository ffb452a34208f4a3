mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

async fn create_event(app: &common::TestApp, token: &str, ngo_id: i32, max: i32) -> i64 {
    let date = (chrono::Utc::now().date_naive() + chrono::Duration::days(10)).to_string();
    let (status, body) = app
        .post(
            "/events",
            token,
            json!({
                "ngo_id": ngo_id,
                "title": "Community lunch",
                "description": "Monthly lunch at the hall",
                "event_type": "social",
                "event_date": date,
                "start_time": "12:00:00",
                "end_time": "14:00:00",
                "venue": "Town hall",
                "address": "1 Main Street",
                "max_participants": max,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

async fn fetch_event(app: &common::TestApp, token: &str, event_id: i64) -> Value {
    let (status, body) = app.get(&format!("/events/{event_id}"), token).await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn registering_twice_for_the_same_event_conflicts() {
    let app = common::spawn_app().await;
    let (organizer_id, organizer) = app.register("organizer", "ngo_admin").await;
    let (_, margaret) = app.register("margaret", "senior").await;
    let ngo_id = app
        .create_ngo(&organizer, "silverline", Some(organizer_id))
        .await;
    let event_id = create_event(&app, &organizer, ngo_id, 50).await;

    let (status, body) = app
        .post_empty(&format!("/events/{event_id}/register"), &margaret)
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["event_id"].as_i64().unwrap(), event_id);

    let (status, body) = app
        .post_empty(&format!("/events/{event_id}/register"), &margaret)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    // The duplicate attempt did not touch the counter.
    let event = fetch_event(&app, &margaret, event_id).await;
    assert_eq!(event["current_registrations"], 1);
}

#[tokio::test]
async fn capacity_is_enforced_and_the_counter_never_passes_max() {
    let app = common::spawn_app().await;
    let (organizer_id, organizer) = app.register("organizer", "ngo_admin").await;
    let (_, margaret) = app.register("margaret", "senior").await;
    let (_, ruth) = app.register("ruth", "senior").await;
    let (_, harold) = app.register("harold", "senior").await;
    let ngo_id = app
        .create_ngo(&organizer, "silverline", Some(organizer_id))
        .await;
    let event_id = create_event(&app, &organizer, ngo_id, 2).await;

    let (status, _) = app
        .post_empty(&format!("/events/{event_id}/register"), &margaret)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app
        .post(
            &format!("/events/{event_id}/register"),
            &ruth,
            json!({"notes": "Needs a lift"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // Third registration is told the event is full, not that it conflicts.
    let (status, body) = app
        .post_empty(&format!("/events/{event_id}/register"), &harold)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "capacity_exceeded");

    let event = fetch_event(&app, &harold, event_id).await;
    assert_eq!(event["current_registrations"], 2);
    assert_eq!(event["spaces_available"], 0);

    let (status, list) = app
        .get(&format!("/events/{event_id}/registrations"), &organizer)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn registration_notes_travel_onto_the_registration_row() {
    let app = common::spawn_app().await;
    let (organizer_id, organizer) = app.register("organizer", "ngo_admin").await;
    let (margaret_id, margaret) = app.register("margaret", "senior").await;
    let ngo_id = app
        .create_ngo(&organizer, "silverline", Some(organizer_id))
        .await;
    let event_id = create_event(&app, &organizer, ngo_id, 50).await;

    let (status, body) = app
        .post(
            &format!("/events/{event_id}/register"),
            &margaret,
            json!({"notes": "Vegetarian meal"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user_id"].as_i64().unwrap() as i32, margaret_id);
    assert_eq!(body["notes"], "Vegetarian meal");
    assert_eq!(body["attended"], false);
}
