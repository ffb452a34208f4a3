use std::collections::{HashMap, HashSet};

use axum::{
    routing::{get, post},
    Extension, Router,
};
use sea_orm::{
    ActiveEnum, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
};

use crate::entities::{ngo, prelude::*, user};

use self::error::ApiError;

pub mod appointments;
pub mod auth;
pub mod care_assignments;
pub mod caretakers;
pub mod dashboard;
pub mod emergency_alerts;
pub mod error;
pub mod events;
pub mod health_records;
pub mod medication_logs;
pub mod medications;
pub mod middleware;
pub mod ngos;
pub mod notifications;
pub mod scope;
pub mod seniors;
pub mod tasks;
pub mod users;
pub mod volunteers;

/// The full API surface: public auth routes plus the token-guarded resource
/// routes, with the database connection injected. The server binary wraps
/// this in its telemetry, metrics, and CORS layers; integration tests drive
/// it directly.
pub fn router(db: DatabaseConnection) -> Router {
    let public = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    let protected = Router::new()
        .route("/auth/logout", post(auth::logout))
        // Users
        .route("/users", get(users::list_users))
        .route("/users/me", get(users::me))
        .route(
            "/users/:id",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/:id/activate", post(users::activate_user))
        .route("/users/:id/deactivate", post(users::deactivate_user))
        // Senior profiles
        .route(
            "/seniors",
            get(seniors::list_profiles).post(seniors::create_profile),
        )
        .route(
            "/seniors/:id",
            get(seniors::get_profile)
                .patch(seniors::update_profile)
                .delete(seniors::delete_profile),
        )
        // Caretaker profiles
        .route(
            "/caretakers",
            get(caretakers::list_profiles).post(caretakers::create_profile),
        )
        .route("/caretakers/available", get(caretakers::available))
        .route(
            "/caretakers/:id",
            get(caretakers::get_profile)
                .patch(caretakers::update_profile)
                .delete(caretakers::delete_profile),
        )
        // Volunteer profiles
        .route(
            "/volunteers",
            get(volunteers::list_profiles).post(volunteers::create_profile),
        )
        .route("/volunteers/my-stats", get(volunteers::my_stats))
        .route(
            "/volunteers/:id",
            get(volunteers::get_profile)
                .patch(volunteers::update_profile)
                .delete(volunteers::delete_profile),
        )
        // NGOs
        .route("/ngos", get(ngos::list_ngos).post(ngos::create_ngo))
        .route(
            "/ngos/:id",
            get(ngos::get_ngo)
                .patch(ngos::update_ngo)
                .delete(ngos::delete_ngo),
        )
        .route("/ngos/:id/verify", post(ngos::verify_ngo))
        // Care assignments
        .route(
            "/care-assignments",
            get(care_assignments::list_assignments).post(care_assignments::create_assignment),
        )
        .route(
            "/care-assignments/:id",
            get(care_assignments::get_assignment)
                .patch(care_assignments::update_assignment)
                .delete(care_assignments::delete_assignment),
        )
        // Appointments
        .route(
            "/appointments",
            get(appointments::list_appointments).post(appointments::create_appointment),
        )
        .route("/appointments/upcoming", get(appointments::upcoming))
        .route(
            "/appointments/:id",
            get(appointments::get_appointment)
                .patch(appointments::update_appointment)
                .delete(appointments::delete_appointment),
        )
        .route("/appointments/:id/confirm", post(appointments::confirm))
        .route("/appointments/:id/complete", post(appointments::complete))
        // Medications
        .route(
            "/medications",
            get(medications::list_medications).post(medications::create_medication),
        )
        .route("/medications/active", get(medications::active))
        .route(
            "/medications/:id",
            get(medications::get_medication)
                .patch(medications::update_medication)
                .delete(medications::delete_medication),
        )
        // Medication logs
        .route(
            "/medication-logs",
            get(medication_logs::list_logs).post(medication_logs::create_log),
        )
        .route(
            "/medication-logs/:id",
            get(medication_logs::get_log)
                .patch(medication_logs::update_log)
                .delete(medication_logs::delete_log),
        )
        .route(
            "/medication-logs/:id/mark-taken",
            post(medication_logs::mark_taken),
        )
        // Volunteer tasks
        .route("/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route("/tasks/my-tasks", get(tasks::my_tasks))
        .route(
            "/tasks/:id",
            get(tasks::get_task)
                .patch(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/tasks/:id/accept", post(tasks::accept))
        .route("/tasks/:id/start", post(tasks::start))
        .route("/tasks/:id/complete", post(tasks::complete))
        // Emergency alerts
        .route(
            "/emergency-alerts",
            get(emergency_alerts::list_alerts).post(emergency_alerts::create_alert),
        )
        .route("/emergency-alerts/active", get(emergency_alerts::active))
        .route(
            "/emergency-alerts/:id",
            get(emergency_alerts::get_alert)
                .patch(emergency_alerts::update_alert)
                .delete(emergency_alerts::delete_alert),
        )
        .route("/emergency-alerts/:id/resolve", post(emergency_alerts::resolve))
        // Health records
        .route(
            "/health-records",
            get(health_records::list_records).post(health_records::create_record),
        )
        .route(
            "/health-records/:id",
            get(health_records::get_record)
                .patch(health_records::update_record)
                .delete(health_records::delete_record),
        )
        // Events
        .route("/events", get(events::list_events).post(events::create_event))
        .route("/events/upcoming", get(events::upcoming))
        .route(
            "/events/:id",
            get(events::get_event)
                .patch(events::update_event)
                .delete(events::delete_event),
        )
        .route("/events/:id/register", post(events::register))
        .route("/events/:id/registrations", get(events::list_registrations))
        // Notifications
        .route(
            "/notifications",
            get(notifications::list_notifications).post(notifications::create_notification),
        )
        .route("/notifications/unread", get(notifications::unread))
        .route(
            "/notifications/mark-all-read",
            post(notifications::mark_all_read),
        )
        .route(
            "/notifications/:id",
            get(notifications::get_notification)
                .patch(notifications::update_notification)
                .delete(notifications::delete_notification),
        )
        .route("/notifications/:id/mark-read", post(notifications::mark_read))
        .route(
            "/notifications/:id/mark-unread",
            post(notifications::mark_unread),
        )
        // Dashboard
        .route("/dashboard/stats", get(dashboard::stats))
        .route_layer(axum::middleware::from_fn(middleware::auth_middleware));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(Extension(db))
}

/// Confirms a referenced user exists and holds the required role. Write
/// handlers use this to keep role-constrained references honest (a care
/// assignment's senior_id really is a senior, and so on).
pub async fn expect_role<C>(db: &C, user_id: i32, role: user::Role) -> Result<user::Model, ApiError>
where
    C: ConnectionTrait,
{
    let account = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::Validation(format!("User {} does not exist", user_id)))?;
    if account.role != role {
        return Err(ApiError::Validation(format!(
            "User {} must have the {} role",
            user_id,
            role.to_value()
        )));
    }
    Ok(account)
}

/// Resolves user ids to display names in one query, for decorating response
/// payloads with `*_name` fields.
pub async fn user_name_map<C, I>(db: &C, ids: I) -> Result<HashMap<i32, String>, DbErr>
where
    C: ConnectionTrait,
    I: IntoIterator<Item = i32>,
{
    let ids: HashSet<i32> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = User::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|u| (u.id, u.full_name())).collect())
}

/// Same as [`user_name_map`] for NGO display names.
pub async fn ngo_name_map<C, I>(db: &C, ids: I) -> Result<HashMap<i32, String>, DbErr>
where
    C: ConnectionTrait,
    I: IntoIterator<Item = i32>,
{
    let ids: HashSet<i32> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = Ngo::find()
        .filter(ngo::Column::Id.is_in(ids))
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|n| (n.id, n.name)).collect())
}
