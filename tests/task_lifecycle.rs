mod common;

use axum::http::StatusCode;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde_json::json;

use seniorcare_server::entities::{prelude::VolunteerTask, volunteer_task};

struct Fixture {
    app: common::TestApp,
    senior_token: String,
    volunteer_token: String,
    task_id: i64,
}

/// A senior, a volunteer with a profile, an NGO, and one freshly assigned
/// task between them.
async fn assigned_task() -> Fixture {
    let app = common::spawn_app().await;
    let (senior_id, senior_token) = app.register("margaret", "senior").await;
    let (volunteer_id, volunteer_token) = app.register("dev", "volunteer").await;
    let (organizer_id, organizer) = app.register("organizer", "ngo_admin").await;
    let ngo_id = app
        .create_ngo(&organizer, "silverline", Some(organizer_id))
        .await;

    let (status, profile) = app
        .post(
            "/volunteers",
            &volunteer_token,
            json!({
                "user_id": volunteer_id,
                "ngo_id": ngo_id,
                "volunteer_code": "VOL-7",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{profile}");

    let date = (chrono::Utc::now().date_naive() + chrono::Duration::days(1)).to_string();
    let (status, task) = app
        .post(
            "/tasks",
            &organizer,
            json!({
                "senior_id": senior_id,
                "volunteer_id": volunteer_id,
                "ngo_id": ngo_id,
                "title": "Pharmacy run",
                "task_type": "errand",
                "description": "Pick up the monthly prescription",
                "scheduled_date": date,
                "scheduled_time": "10:00:00",
                "location": "Corner pharmacy",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{task}");
    assert_eq!(task["status"], "assigned");
    assert_eq!(task["hours_logged"].as_f64().unwrap(), 0.0);
    let task_id = task["id"].as_i64().unwrap();

    Fixture {
        app,
        senior_token,
        volunteer_token,
        task_id,
    }
}

/// Moves the stored start time back so completion maths have something to
/// measure.
async fn backdate_start(app: &common::TestApp, task_id: i64, seconds: i64) {
    let task = VolunteerTask::find_by_id(task_id as i32)
        .one(&app.db)
        .await
        .unwrap()
        .expect("task row");
    let started = chrono::Utc::now().naive_utc() - chrono::Duration::seconds(seconds);
    let mut active: volunteer_task::ActiveModel = task.into();
    active.actual_start_time = Set(Some(started));
    active.update(&app.db).await.unwrap();
}

#[tokio::test]
async fn accept_start_complete_logs_hours_and_bumps_the_profile() {
    let fx = assigned_task().await;
    let app = &fx.app;
    let task = format!("/tasks/{}", fx.task_id);

    let (status, body) = app
        .post_empty(&format!("{task}/accept"), &fx.volunteer_token)
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "accepted");

    let (status, body) = app
        .post_empty(&format!("{task}/start"), &fx.volunteer_token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "in_progress");
    assert!(!body["actual_start_time"].is_null());

    // Ninety minutes of work.
    backdate_start(app, fx.task_id, 5400).await;

    let (status, body) = app
        .post(
            &format!("{task}/complete"),
            &fx.volunteer_token,
            json!({"notes": "Prescription delivered"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "completed");
    assert!(!body["actual_end_time"].is_null());
    assert_eq!(body["completion_notes"], "Prescription delivered");
    let hours = body["hours_logged"].as_f64().unwrap();
    assert!((hours - 1.5).abs() < 0.01, "hours_logged = {hours}");

    // The volunteer profile counters moved in the same transaction.
    let (status, stats) = app
        .get("/volunteers/my-stats", &fx.volunteer_token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["tasks_completed"], 1);
    let total = stats["total_hours"].as_f64().unwrap();
    assert!((total - 1.5).abs() < 0.01, "total_hours = {total}");

    // Completed tasks leave the open list.
    let (_, open) = app.get("/tasks/my-tasks", &fx.volunteer_token).await;
    assert!(open.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn out_of_order_transitions_conflict_and_change_nothing() {
    let fx = assigned_task().await;
    let app = &fx.app;
    let task = format!("/tasks/{}", fx.task_id);

    // Cannot start or complete a task that was never accepted.
    let (status, body) = app
        .post_empty(&format!("{task}/start"), &fx.volunteer_token)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
    let (status, _) = app
        .post_empty(&format!("{task}/complete"), &fx.volunteer_token)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = app.get(&task, &fx.volunteer_token).await;
    assert_eq!(body["status"], "assigned");
    assert!(body["actual_start_time"].is_null());
    assert_eq!(body["hours_logged"].as_f64().unwrap(), 0.0);

    // Accept is not repeatable either.
    let (status, _) = app
        .post_empty(&format!("{task}/accept"), &fx.volunteer_token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .post_empty(&format!("{task}/accept"), &fx.volunteer_token)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn only_the_assigned_volunteer_or_an_admin_may_move_a_task() {
    let fx = assigned_task().await;
    let app = &fx.app;
    let task = format!("/tasks/{}", fx.task_id);

    // The senior can see the task but cannot drive it.
    let (status, body) = app
        .post_empty(&format!("{task}/accept"), &fx.senior_token)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    // Another volunteer cannot even see it.
    let (_, other_token) = app.register("imposter", "volunteer").await;
    let (status, body) = app
        .post_empty(&format!("{task}/accept"), &other_token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    // The assigned volunteer drives it as usual.
    let (status, _) = app
        .post_empty(&format!("{task}/accept"), &fx.volunteer_token)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn completion_without_a_volunteer_profile_still_lands() {
    let app = common::spawn_app().await;
    let (senior_id, _) = app.register("margaret", "senior").await;
    let (volunteer_id, volunteer_token) = app.register("dev", "volunteer").await;
    let (organizer_id, organizer) = app.register("organizer", "ngo_admin").await;
    let ngo_id = app
        .create_ngo(&organizer, "silverline", Some(organizer_id))
        .await;

    let date = (chrono::Utc::now().date_naive() + chrono::Duration::days(1)).to_string();
    let (status, task) = app
        .post(
            "/tasks",
            &organizer,
            json!({
                "senior_id": senior_id,
                "volunteer_id": volunteer_id,
                "ngo_id": ngo_id,
                "title": "Grocery run",
                "task_type": "errand",
                "description": "Weekly shop",
                "scheduled_date": date,
                "scheduled_time": "10:00:00",
                "location": "Market",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{task}");
    let task_id = task["id"].as_i64().unwrap();

    let path = format!("/tasks/{task_id}");
    app.post_empty(&format!("{path}/accept"), &volunteer_token)
        .await;
    app.post_empty(&format!("{path}/start"), &volunteer_token)
        .await;
    backdate_start(&app, task_id, 3600).await;

    let (status, body) = app
        .post_empty(&format!("{path}/complete"), &volunteer_token)
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "completed");
    let hours = body["hours_logged"].as_f64().unwrap();
    assert!((hours - 1.0).abs() < 0.01, "hours_logged = {hours}");
}
