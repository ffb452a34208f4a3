use axum::{extract::Extension, Json};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::{json, Value};

use crate::entities::appointment::AppointmentStatus;
use crate::entities::volunteer_task::TaskStatus;
use crate::entities::{
    appointment, care_assignment, emergency_alert, event, medication, ngo, notification,
    prelude::*, user, volunteer_profile, volunteer_task,
};

use super::error::ApiError;
use super::middleware::CurrentUser;

/// GET /dashboard/stats - a flat JSON object of counters, keyed by the
/// caller's role. Recomputed on every request.
pub async fn stats(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<Json<Value>, ApiError> {
    let stats = match caller.role {
        user::Role::Senior => senior_stats(&db, caller.id).await?,
        user::Role::Caretaker => caretaker_stats(&db, caller.id).await?,
        user::Role::Volunteer => volunteer_stats(&db, caller.id).await?,
        user::Role::SeniorAdmin => senior_admin_stats(&db).await?,
        user::Role::NgoAdmin => ngo_admin_stats(&db, caller.id).await?,
    };
    Ok(Json(stats))
}

async fn senior_stats(db: &DatabaseConnection, user_id: i32) -> Result<Value, ApiError> {
    let today = chrono::Utc::now().naive_utc().date();
    let upcoming_appointments = Appointment::find()
        .filter(appointment::Column::SeniorId.eq(user_id))
        .filter(appointment::Column::AppointmentDate.gte(today))
        .filter(appointment::Column::Status.is_in([
            AppointmentStatus::Scheduled,
            AppointmentStatus::Confirmed,
        ]))
        .count(db)
        .await?;
    let active_medications = Medication::find()
        .filter(medication::Column::SeniorId.eq(user_id))
        .filter(medication::Column::IsActive.eq(true))
        .count(db)
        .await?;
    let unread_notifications = Notification::find()
        .filter(notification::Column::UserId.eq(user_id))
        .filter(notification::Column::IsRead.eq(false))
        .count(db)
        .await?;
    Ok(json!({
        "upcoming_appointments": upcoming_appointments,
        "active_medications": active_medications,
        "unread_notifications": unread_notifications,
    }))
}

async fn caretaker_stats(db: &DatabaseConnection, user_id: i32) -> Result<Value, ApiError> {
    let today = chrono::Utc::now().naive_utc().date();
    let assigned_seniors = CareAssignment::find()
        .filter(care_assignment::Column::CaretakerId.eq(user_id))
        .filter(care_assignment::Column::IsActive.eq(true))
        .count(db)
        .await?;
    let today_appointments = Appointment::find()
        .filter(appointment::Column::CaretakerId.eq(user_id))
        .filter(appointment::Column::AppointmentDate.eq(today))
        .count(db)
        .await?;
    let pending_tasks = pending_task_count(db, user_id).await?;
    Ok(json!({
        "assigned_seniors": assigned_seniors,
        "today_appointments": today_appointments,
        "pending_tasks": pending_tasks,
    }))
}

/// Absent profile degrades to an empty object rather than an error.
async fn volunteer_stats(db: &DatabaseConnection, user_id: i32) -> Result<Value, ApiError> {
    let profile = VolunteerProfile::find()
        .filter(volunteer_profile::Column::UserId.eq(user_id))
        .one(db)
        .await?;
    let Some(profile) = profile else {
        return Ok(json!({}));
    };
    let pending_tasks = pending_task_count(db, user_id).await?;
    Ok(json!({
        "total_hours": profile.total_hours,
        "seniors_helped": profile.seniors_helped,
        "tasks_completed": profile.tasks_completed,
        "pending_tasks": pending_tasks,
    }))
}

async fn senior_admin_stats(db: &DatabaseConnection) -> Result<Value, ApiError> {
    let total_seniors = User::find()
        .filter(user::Column::Role.eq(user::Role::Senior))
        .count(db)
        .await?;
    let total_caretakers = User::find()
        .filter(user::Column::Role.eq(user::Role::Caretaker))
        .count(db)
        .await?;
    let active_assignments = CareAssignment::find()
        .filter(care_assignment::Column::IsActive.eq(true))
        .count(db)
        .await?;
    let active_alerts = EmergencyAlert::find()
        .filter(emergency_alert::Column::IsResolved.eq(false))
        .count(db)
        .await?;
    Ok(json!({
        "total_seniors": total_seniors,
        "total_caretakers": total_caretakers,
        "active_assignments": active_assignments,
        "active_alerts": active_alerts,
    }))
}

/// Keyed off the NGO the caller administers; none means an empty object.
async fn ngo_admin_stats(db: &DatabaseConnection, user_id: i32) -> Result<Value, ApiError> {
    let managed = Ngo::find()
        .filter(ngo::Column::AdminId.eq(user_id))
        .one(db)
        .await?;
    let Some(managed) = managed else {
        return Ok(json!({}));
    };

    let today = chrono::Utc::now().naive_utc().date();
    let total_volunteers = VolunteerProfile::find()
        .filter(volunteer_profile::Column::NgoId.eq(managed.id))
        .count(db)
        .await?;
    let active_tasks = VolunteerTask::find()
        .filter(volunteer_task::Column::NgoId.eq(managed.id))
        .filter(volunteer_task::Column::Status.is_in([
            TaskStatus::Assigned,
            TaskStatus::Accepted,
            TaskStatus::InProgress,
        ]))
        .count(db)
        .await?;
    let upcoming_events = Event::find()
        .filter(event::Column::NgoId.eq(managed.id))
        .filter(event::Column::EventDate.gte(today))
        .filter(event::Column::IsActive.eq(true))
        .count(db)
        .await?;
    Ok(json!({
        "total_volunteers": total_volunteers,
        "active_tasks": active_tasks,
        "upcoming_events": upcoming_events,
    }))
}

async fn pending_task_count(db: &DatabaseConnection, user_id: i32) -> Result<u64, ApiError> {
    let count = VolunteerTask::find()
        .filter(volunteer_task::Column::VolunteerId.eq(user_id))
        .filter(volunteer_task::Column::Status.is_in([TaskStatus::Assigned, TaskStatus::Accepted]))
        .count(db)
        .await?;
    Ok(count)
}
