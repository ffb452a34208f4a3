use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, ModelTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::entities::appointment::{self, AppointmentStatus};
use crate::entities::user;

use super::error::ApiError;
use super::middleware::CurrentUser;
use super::scope;

#[derive(Serialize)]
pub struct AppointmentResponse {
    pub id: i32,
    pub senior_id: i32,
    pub senior_name: Option<String>,
    pub title: String,
    pub appointment_type: String,
    pub description: Option<String>,
    pub appointment_date: chrono::NaiveDate,
    pub appointment_time: chrono::NaiveTime,
    pub duration_minutes: i32,
    pub location: String,
    pub doctor_name: Option<String>,
    pub status: AppointmentStatus,
    pub reminder_sent: bool,
    pub reminder_time: Option<chrono::NaiveDateTime>,
    pub caretaker_id: Option<i32>,
    pub caretaker_name: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<i32>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl AppointmentResponse {
    fn from_parts(
        model: appointment::Model,
        names: &std::collections::HashMap<i32, String>,
    ) -> Self {
        Self {
            id: model.id,
            senior_name: names.get(&model.senior_id).cloned(),
            senior_id: model.senior_id,
            title: model.title,
            appointment_type: model.appointment_type,
            description: model.description,
            appointment_date: model.appointment_date,
            appointment_time: model.appointment_time,
            duration_minutes: model.duration_minutes,
            location: model.location,
            doctor_name: model.doctor_name,
            status: model.status,
            reminder_sent: model.reminder_sent,
            reminder_time: model.reminder_time,
            caretaker_name: model
                .caretaker_id
                .and_then(|id| names.get(&id).cloned()),
            caretaker_id: model.caretaker_id,
            notes: model.notes,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Deserialize)]
pub struct AppointmentListParams {
    pub status: Option<String>,
    pub appointment_type: Option<String>,
    pub senior: Option<i32>,
    pub caretaker: Option<i32>,
    pub search: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateAppointmentRequest {
    pub senior_id: i32,
    pub title: String,
    pub appointment_type: String,
    pub description: Option<String>,
    pub appointment_date: chrono::NaiveDate,
    pub appointment_time: chrono::NaiveTime,
    pub duration_minutes: Option<i32>,
    pub location: String,
    pub doctor_name: Option<String>,
    pub reminder_time: Option<chrono::NaiveDateTime>,
    pub caretaker_id: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateAppointmentRequest {
    pub title: Option<String>,
    pub appointment_type: Option<String>,
    pub description: Option<String>,
    pub appointment_date: Option<chrono::NaiveDate>,
    pub appointment_time: Option<chrono::NaiveTime>,
    pub duration_minutes: Option<i32>,
    pub location: Option<String>,
    pub doctor_name: Option<String>,
    pub status: Option<String>,
    pub reminder_time: Option<chrono::NaiveDateTime>,
    pub caretaker_id: Option<i32>,
    pub notes: Option<String>,
}

async fn names_for(
    db: &DatabaseConnection,
    rows: &[appointment::Model],
) -> Result<std::collections::HashMap<i32, String>, ApiError> {
    let ids = rows
        .iter()
        .flat_map(|a| std::iter::once(a.senior_id).chain(a.caretaker_id));
    Ok(super::user_name_map(db, ids).await?)
}

/// A row outside the caller's scope reads as missing.
async fn find_scoped(
    db: &DatabaseConnection,
    caller: CurrentUser,
    appointment_id: i32,
) -> Result<appointment::Model, ApiError> {
    scope::appointments(caller)
        .filter(appointment::Column::Id.eq(appointment_id))
        .one(db)
        .await?
        .ok_or(ApiError::NotFound("Appointment"))
}

/// GET /appointments
pub async fn list_appointments(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Query(params): Query<AppointmentListParams>,
) -> Result<Json<Vec<AppointmentResponse>>, ApiError> {
    let mut select = scope::appointments(caller);

    if let Some(status) = params.status {
        let status = AppointmentStatus::try_from_value(&status)
            .map_err(|_| ApiError::Validation(format!("Unknown status: {}", status)))?;
        select = select.filter(appointment::Column::Status.eq(status));
    }
    if let Some(appointment_type) = params.appointment_type {
        select = select.filter(appointment::Column::AppointmentType.eq(appointment_type));
    }
    if let Some(senior) = params.senior {
        select = select.filter(appointment::Column::SeniorId.eq(senior));
    }
    if let Some(caretaker) = params.caretaker {
        select = select.filter(appointment::Column::CaretakerId.eq(caretaker));
    }
    if let Some(search) = params.search {
        select = select.filter(
            Condition::any()
                .add(appointment::Column::Title.contains(&search))
                .add(appointment::Column::DoctorName.contains(&search))
                .add(appointment::Column::Location.contains(&search)),
        );
    }

    let rows = select
        .order_by_asc(appointment::Column::AppointmentDate)
        .order_by_asc(appointment::Column::AppointmentTime)
        .all(&db)
        .await?;
    let names = names_for(&db, &rows).await?;
    Ok(Json(
        rows.into_iter()
            .map(|a| AppointmentResponse::from_parts(a, &names))
            .collect(),
    ))
}

/// GET /appointments/upcoming - today onward, still scheduled or confirmed.
pub async fn upcoming(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<Json<Vec<AppointmentResponse>>, ApiError> {
    let today = chrono::Utc::now().naive_utc().date();
    let rows = scope::appointments(caller)
        .filter(appointment::Column::AppointmentDate.gte(today))
        .filter(appointment::Column::Status.is_in([
            AppointmentStatus::Scheduled,
            AppointmentStatus::Confirmed,
        ]))
        .order_by_asc(appointment::Column::AppointmentDate)
        .order_by_asc(appointment::Column::AppointmentTime)
        .all(&db)
        .await?;
    let names = names_for(&db, &rows).await?;
    Ok(Json(
        rows.into_iter()
            .map(|a| AppointmentResponse::from_parts(a, &names))
            .collect(),
    ))
}

/// GET /appointments/:id
pub async fn get_appointment(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(appointment_id): Path<i32>,
) -> Result<Json<AppointmentResponse>, ApiError> {
    let appointment = find_scoped(&db, caller, appointment_id).await?;
    let names = names_for(&db, std::slice::from_ref(&appointment)).await?;
    Ok(Json(AppointmentResponse::from_parts(appointment, &names)))
}

/// POST /appointments
pub async fn create_appointment(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<Response, ApiError> {
    super::expect_role(&db, payload.senior_id, user::Role::Senior).await?;
    if let Some(caretaker_id) = payload.caretaker_id {
        super::expect_role(&db, caretaker_id, user::Role::Caretaker).await?;
    }

    let now = chrono::Utc::now().naive_utc();
    let appointment = appointment::ActiveModel {
        senior_id: Set(payload.senior_id),
        title: Set(payload.title),
        appointment_type: Set(payload.appointment_type),
        description: Set(payload.description),
        appointment_date: Set(payload.appointment_date),
        appointment_time: Set(payload.appointment_time),
        duration_minutes: Set(payload.duration_minutes.unwrap_or(30)),
        location: Set(payload.location),
        doctor_name: Set(payload.doctor_name),
        status: Set(AppointmentStatus::Scheduled),
        reminder_sent: Set(false),
        reminder_time: Set(payload.reminder_time),
        caretaker_id: Set(payload.caretaker_id),
        notes: Set(payload.notes),
        created_by: Set(Some(caller.id)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    info!(
        "Appointment {} scheduled for senior {} by user {}",
        appointment.id, appointment.senior_id, caller.id
    );
    let names = names_for(&db, std::slice::from_ref(&appointment)).await?;
    Ok((
        StatusCode::CREATED,
        Json(AppointmentResponse::from_parts(appointment, &names)),
    )
        .into_response())
}

/// PATCH /appointments/:id
pub async fn update_appointment(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(appointment_id): Path<i32>,
    Json(payload): Json<UpdateAppointmentRequest>,
) -> Result<Json<AppointmentResponse>, ApiError> {
    let appointment = find_scoped(&db, caller, appointment_id).await?;

    let mut active: appointment::ActiveModel = appointment.into();
    if let Some(title) = payload.title {
        active.title = Set(title);
    }
    if let Some(appointment_type) = payload.appointment_type {
        active.appointment_type = Set(appointment_type);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(date) = payload.appointment_date {
        active.appointment_date = Set(date);
    }
    if let Some(time) = payload.appointment_time {
        active.appointment_time = Set(time);
    }
    if let Some(duration_minutes) = payload.duration_minutes {
        active.duration_minutes = Set(duration_minutes);
    }
    if let Some(location) = payload.location {
        active.location = Set(location);
    }
    if let Some(doctor_name) = payload.doctor_name {
        active.doctor_name = Set(Some(doctor_name));
    }
    if let Some(status) = payload.status {
        let status = AppointmentStatus::try_from_value(&status)
            .map_err(|_| ApiError::Validation(format!("Unknown status: {}", status)))?;
        active.status = Set(status);
    }
    if let Some(reminder_time) = payload.reminder_time {
        active.reminder_time = Set(Some(reminder_time));
    }
    if let Some(caretaker_id) = payload.caretaker_id {
        super::expect_role(&db, caretaker_id, user::Role::Caretaker).await?;
        active.caretaker_id = Set(Some(caretaker_id));
    }
    if let Some(notes) = payload.notes {
        active.notes = Set(Some(notes));
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());

    let appointment = active.update(&db).await?;
    let names = names_for(&db, std::slice::from_ref(&appointment)).await?;

    info!("Updated appointment {}", appointment.id);
    Ok(Json(AppointmentResponse::from_parts(appointment, &names)))
}

/// DELETE /appointments/:id
pub async fn delete_appointment(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(appointment_id): Path<i32>,
) -> Result<Response, ApiError> {
    let appointment = find_scoped(&db, caller, appointment_id).await?;
    appointment.delete(&db).await?;

    info!("Deleted appointment {}", appointment_id);
    Ok((
        StatusCode::OK,
        Json(json!({"message": "Appointment deleted"})),
    )
        .into_response())
}

/// POST /appointments/:id/confirm
pub async fn confirm(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(appointment_id): Path<i32>,
) -> Result<Json<AppointmentResponse>, ApiError> {
    transition(&db, caller, appointment_id, AppointmentStatus::Confirmed).await
}

/// POST /appointments/:id/complete
pub async fn complete(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(appointment_id): Path<i32>,
) -> Result<Json<AppointmentResponse>, ApiError> {
    transition(&db, caller, appointment_id, AppointmentStatus::Completed).await
}

/// Confirm and complete both start from a live appointment; anything
/// already completed, cancelled, or rescheduled conflicts.
async fn transition(
    db: &DatabaseConnection,
    caller: CurrentUser,
    appointment_id: i32,
    target: AppointmentStatus,
) -> Result<Json<AppointmentResponse>, ApiError> {
    let appointment = find_scoped(db, caller, appointment_id).await?;
    if !matches!(
        appointment.status,
        AppointmentStatus::Scheduled | AppointmentStatus::Confirmed
    ) {
        return Err(ApiError::Conflict(format!(
            "Appointment is {} and cannot move to {}",
            appointment.status.to_value(),
            target.to_value()
        )));
    }

    let mut active: appointment::ActiveModel = appointment.into();
    active.status = Set(target);
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    let appointment = active.update(db).await?;

    info!(
        "Appointment {} moved to {} by user {}",
        appointment.id,
        target.to_value(),
        caller.id
    );
    let names = names_for(db, std::slice::from_ref(&appointment)).await?;
    Ok(Json(AppointmentResponse::from_parts(appointment, &names)))
}
