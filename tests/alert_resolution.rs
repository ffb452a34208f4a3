mod common;

use axum::http::StatusCode;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde_json::json;

use seniorcare_server::entities::{emergency_alert, prelude::EmergencyAlert};

async fn raise_alert(app: &common::TestApp, senior_id: i32, token: &str) -> i64 {
    let (status, body) = app
        .post(
            "/emergency-alerts",
            token,
            json!({
                "senior_id": senior_id,
                "alert_type": "fall",
                "location": "Kitchen",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["is_resolved"], false);
    body["id"].as_i64().unwrap()
}

async fn backdate_alert(app: &common::TestApp, alert_id: i64, seconds: i64) {
    let alert = EmergencyAlert::find_by_id(alert_id as i32)
        .one(&app.db)
        .await
        .unwrap()
        .expect("alert row");
    let raised = chrono::Utc::now().naive_utc() - chrono::Duration::seconds(seconds);
    let mut active: emergency_alert::ActiveModel = alert.into();
    active.alert_time = Set(raised);
    active.update(&app.db).await.unwrap();
}

#[tokio::test]
async fn resolving_an_alert_stamps_responder_and_response_time() {
    let app = common::spawn_app().await;
    let (margaret_id, margaret) = app.register("margaret", "senior").await;
    let (frank_id, frank) = app.register("frank", "caretaker").await;

    let alert_id = raise_alert(&app, margaret_id, &margaret).await;

    // Alerts are visible to every authenticated role.
    let (status, active) = app.get("/emergency-alerts/active", &frank).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(active.as_array().unwrap().len(), 1);

    backdate_alert(&app, alert_id, 90).await;

    let (status, body) = app
        .post(
            &format!("/emergency-alerts/{alert_id}/resolve"),
            &frank,
            json!({"notes": "Reached her flat, no injury"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["is_resolved"], true);
    assert_eq!(body["resolved_by"].as_i64().unwrap() as i32, frank_id);
    assert_eq!(body["resolution_notes"], "Reached her flat, no injury");
    assert!(!body["resolved_at"].is_null());
    let seconds = body["response_time_seconds"].as_i64().unwrap();
    assert!((90..92).contains(&seconds), "response took {seconds}s");

    let (_, active) = app.get("/emergency-alerts/active", &frank).await;
    assert!(active.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn an_alert_resolves_exactly_once() {
    let app = common::spawn_app().await;
    let (margaret_id, margaret) = app.register("margaret", "senior").await;
    let (_, frank) = app.register("frank", "caretaker").await;

    let alert_id = raise_alert(&app, margaret_id, &margaret).await;
    let path = format!("/emergency-alerts/{alert_id}/resolve");

    let (status, first) = app.post_empty(&path, &frank).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.post_empty(&path, &frank).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    // The second attempt changed nothing.
    let (_, current) = app
        .get(&format!("/emergency-alerts/{alert_id}"), &margaret)
        .await;
    assert_eq!(current["resolved_at"], first["resolved_at"]);
    assert_eq!(current["resolved_by"], first["resolved_by"]);
}

#[tokio::test]
async fn alerts_can_only_be_raised_for_seniors() {
    let app = common::spawn_app().await;
    let (frank_id, frank) = app.register("frank", "caretaker").await;

    let (status, body) = app
        .post(
            "/emergency-alerts",
            &frank,
            json!({"senior_id": frank_id, "alert_type": "fall"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");
}
