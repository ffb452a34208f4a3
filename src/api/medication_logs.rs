use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::entities::{medication, medication_log, prelude::*};

use super::error::ApiError;
use super::middleware::CurrentUser;

#[derive(Serialize)]
pub struct MedicationLogResponse {
    pub id: i32,
    pub medication_id: i32,
    pub medication_name: Option<String>,
    pub senior_name: Option<String>,
    pub scheduled_time: chrono::NaiveDateTime,
    pub was_taken: bool,
    pub actual_time: Option<chrono::NaiveDateTime>,
    pub confirmed_by: Option<i32>,
    pub confirmed_by_name: Option<String>,
    pub notes: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

impl MedicationLogResponse {
    fn from_parts(
        model: medication_log::Model,
        medication: Option<medication::Model>,
        names: &std::collections::HashMap<i32, String>,
    ) -> Self {
        Self {
            id: model.id,
            medication_id: model.medication_id,
            senior_name: medication
                .as_ref()
                .and_then(|m| names.get(&m.senior_id).cloned()),
            medication_name: medication.map(|m| m.medication_name),
            scheduled_time: model.scheduled_time,
            was_taken: model.was_taken,
            actual_time: model.actual_time,
            confirmed_by_name: model
                .confirmed_by
                .and_then(|id| names.get(&id).cloned()),
            confirmed_by: model.confirmed_by,
            notes: model.notes,
            created_at: model.created_at,
        }
    }
}

#[derive(Deserialize)]
pub struct LogListParams {
    pub was_taken: Option<bool>,
    pub senior: Option<i32>,
}

#[derive(Deserialize)]
pub struct CreateLogRequest {
    pub medication_id: i32,
    pub scheduled_time: chrono::NaiveDateTime,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateLogRequest {
    pub scheduled_time: Option<chrono::NaiveDateTime>,
    pub notes: Option<String>,
}

async fn names_for(
    db: &DatabaseConnection,
    rows: &[(medication_log::Model, Option<medication::Model>)],
) -> Result<std::collections::HashMap<i32, String>, ApiError> {
    let ids: Vec<i32> = rows
        .iter()
        .flat_map(|(log, med)| {
            med.iter()
                .map(|m| m.senior_id)
                .chain(log.confirmed_by)
        })
        .collect();
    Ok(super::user_name_map(db, ids).await?)
}

async fn names_for_one(
    db: &DatabaseConnection,
    log: &medication_log::Model,
    medication: Option<&medication::Model>,
) -> Result<std::collections::HashMap<i32, String>, ApiError> {
    let ids = medication
        .map(|m| m.senior_id)
        .into_iter()
        .chain(log.confirmed_by);
    Ok(super::user_name_map(db, ids).await?)
}

async fn find_log(
    db: &DatabaseConnection,
    log_id: i32,
) -> Result<(medication_log::Model, Option<medication::Model>), ApiError> {
    MedicationLog::find_by_id(log_id)
        .find_also_related(Medication)
        .one(db)
        .await?
        .ok_or(ApiError::NotFound("Medication log"))
}

/// GET /medication-logs
pub async fn list_logs(
    Extension(db): Extension<DatabaseConnection>,
    Extension(_caller): Extension<CurrentUser>,
    Query(params): Query<LogListParams>,
) -> Result<Json<Vec<MedicationLogResponse>>, ApiError> {
    let mut select = MedicationLog::find();

    if let Some(was_taken) = params.was_taken {
        select = select.filter(medication_log::Column::WasTaken.eq(was_taken));
    }
    if let Some(senior) = params.senior {
        let medication_ids: Vec<i32> = Medication::find()
            .filter(medication::Column::SeniorId.eq(senior))
            .select_only()
            .column(medication::Column::Id)
            .into_tuple()
            .all(&db)
            .await?;
        select = select.filter(medication_log::Column::MedicationId.is_in(medication_ids));
    }

    let rows = select
        .find_also_related(Medication)
        .order_by_desc(medication_log::Column::ScheduledTime)
        .all(&db)
        .await?;
    let names = names_for(&db, &rows).await?;
    Ok(Json(
        rows.into_iter()
            .map(|(log, med)| MedicationLogResponse::from_parts(log, med, &names))
            .collect(),
    ))
}

/// GET /medication-logs/:id
pub async fn get_log(
    Extension(db): Extension<DatabaseConnection>,
    Path(log_id): Path<i32>,
) -> Result<Json<MedicationLogResponse>, ApiError> {
    let (log, med) = find_log(&db, log_id).await?;
    let names = names_for_one(&db, &log, med.as_ref()).await?;
    Ok(Json(MedicationLogResponse::from_parts(log, med, &names)))
}

/// POST /medication-logs
pub async fn create_log(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Json(payload): Json<CreateLogRequest>,
) -> Result<Response, ApiError> {
    let medication = Medication::find_by_id(payload.medication_id)
        .one(&db)
        .await?
        .ok_or_else(|| {
            ApiError::Validation(format!(
                "Medication {} does not exist",
                payload.medication_id
            ))
        })?;

    let log = medication_log::ActiveModel {
        medication_id: Set(payload.medication_id),
        scheduled_time: Set(payload.scheduled_time),
        was_taken: Set(false),
        actual_time: Set(None),
        confirmed_by: Set(None),
        notes: Set(payload.notes),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    info!(
        "Medication log {} opened for medication {} by user {}",
        log.id, log.medication_id, caller.id
    );
    let names = super::user_name_map(&db, [medication.senior_id]).await?;
    Ok((
        StatusCode::CREATED,
        Json(MedicationLogResponse::from_parts(
            log,
            Some(medication),
            &names,
        )),
    )
        .into_response())
}

/// PATCH /medication-logs/:id - intake state only moves through mark-taken.
pub async fn update_log(
    Extension(db): Extension<DatabaseConnection>,
    Path(log_id): Path<i32>,
    Json(payload): Json<UpdateLogRequest>,
) -> Result<Json<MedicationLogResponse>, ApiError> {
    let (log, med) = find_log(&db, log_id).await?;

    let mut active: medication_log::ActiveModel = log.into();
    if let Some(scheduled_time) = payload.scheduled_time {
        active.scheduled_time = Set(scheduled_time);
    }
    if let Some(notes) = payload.notes {
        active.notes = Set(Some(notes));
    }

    let log = active.update(&db).await?;
    let names = names_for_one(&db, &log, med.as_ref()).await?;

    info!("Updated medication log {}", log.id);
    Ok(Json(MedicationLogResponse::from_parts(log, med, &names)))
}

/// DELETE /medication-logs/:id
pub async fn delete_log(
    Extension(db): Extension<DatabaseConnection>,
    Path(log_id): Path<i32>,
) -> Result<Response, ApiError> {
    let (log, _) = find_log(&db, log_id).await?;
    log.delete(&db).await?;

    info!("Deleted medication log {}", log_id);
    Ok((
        StatusCode::OK,
        Json(json!({"message": "Medication log deleted"})),
    )
        .into_response())
}

/// POST /medication-logs/:id/mark-taken - stamps the actual intake time and
/// who confirmed it. A log already marked taken conflicts.
pub async fn mark_taken(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(log_id): Path<i32>,
) -> Result<Json<MedicationLogResponse>, ApiError> {
    let (log, med) = find_log(&db, log_id).await?;
    if log.was_taken {
        return Err(ApiError::Conflict(
            "Medication log is already marked as taken".into(),
        ));
    }

    let mut active: medication_log::ActiveModel = log.into();
    active.was_taken = Set(true);
    active.actual_time = Set(Some(chrono::Utc::now().naive_utc()));
    active.confirmed_by = Set(Some(caller.id));
    let log = active.update(&db).await?;

    info!(
        "Medication log {} marked taken by user {}",
        log.id, caller.id
    );
    let names = names_for_one(&db, &log, med.as_ref()).await?;
    Ok(Json(MedicationLogResponse::from_parts(log, med, &names)))
}
