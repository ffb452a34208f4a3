use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, ModelTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::entities::{health_record, user};

use super::error::ApiError;
use super::middleware::CurrentUser;
use super::scope;

#[derive(Serialize)]
pub struct HealthRecordResponse {
    pub id: i32,
    pub senior_id: i32,
    pub senior_name: Option<String>,
    pub record_date: chrono::NaiveDate,
    pub record_time: chrono::NaiveTime,
    pub blood_pressure_systolic: Option<i32>,
    pub blood_pressure_diastolic: Option<i32>,
    pub heart_rate: Option<i32>,
    pub temperature: Option<f64>,
    pub blood_sugar: Option<i32>,
    pub oxygen_level: Option<i32>,
    pub weight: Option<f64>,
    pub recorded_by: Option<i32>,
    pub recorded_by_name: Option<String>,
    pub notes: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

impl HealthRecordResponse {
    fn from_parts(
        model: health_record::Model,
        names: &std::collections::HashMap<i32, String>,
    ) -> Self {
        Self {
            id: model.id,
            senior_name: names.get(&model.senior_id).cloned(),
            senior_id: model.senior_id,
            record_date: model.record_date,
            record_time: model.record_time,
            blood_pressure_systolic: model.blood_pressure_systolic,
            blood_pressure_diastolic: model.blood_pressure_diastolic,
            heart_rate: model.heart_rate,
            temperature: model.temperature,
            blood_sugar: model.blood_sugar,
            oxygen_level: model.oxygen_level,
            weight: model.weight,
            recorded_by_name: model.recorded_by.and_then(|id| names.get(&id).cloned()),
            recorded_by: model.recorded_by,
            notes: model.notes,
            created_at: model.created_at,
        }
    }
}

#[derive(Deserialize)]
pub struct RecordListParams {
    pub senior: Option<i32>,
    pub record_date: Option<chrono::NaiveDate>,
}

#[derive(Deserialize)]
pub struct CreateRecordRequest {
    pub senior_id: i32,
    pub record_date: Option<chrono::NaiveDate>,
    pub record_time: Option<chrono::NaiveTime>,
    pub blood_pressure_systolic: Option<i32>,
    pub blood_pressure_diastolic: Option<i32>,
    pub heart_rate: Option<i32>,
    pub temperature: Option<f64>,
    pub blood_sugar: Option<i32>,
    pub oxygen_level: Option<i32>,
    pub weight: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateRecordRequest {
    pub record_date: Option<chrono::NaiveDate>,
    pub record_time: Option<chrono::NaiveTime>,
    pub blood_pressure_systolic: Option<i32>,
    pub blood_pressure_diastolic: Option<i32>,
    pub heart_rate: Option<i32>,
    pub temperature: Option<f64>,
    pub blood_sugar: Option<i32>,
    pub oxygen_level: Option<i32>,
    pub weight: Option<f64>,
    pub notes: Option<String>,
}

async fn names_for(
    db: &DatabaseConnection,
    rows: &[health_record::Model],
) -> Result<std::collections::HashMap<i32, String>, ApiError> {
    let ids = rows
        .iter()
        .flat_map(|r| std::iter::once(r.senior_id).chain(r.recorded_by));
    Ok(super::user_name_map(db, ids).await?)
}

async fn find_scoped(
    db: &DatabaseConnection,
    caller: CurrentUser,
    record_id: i32,
) -> Result<health_record::Model, ApiError> {
    scope::health_records(caller)
        .filter(health_record::Column::Id.eq(record_id))
        .one(db)
        .await?
        .ok_or(ApiError::NotFound("Health record"))
}

/// GET /health-records
pub async fn list_records(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Query(params): Query<RecordListParams>,
) -> Result<Json<Vec<HealthRecordResponse>>, ApiError> {
    let mut select = scope::health_records(caller);

    if let Some(senior) = params.senior {
        select = select.filter(health_record::Column::SeniorId.eq(senior));
    }
    if let Some(record_date) = params.record_date {
        select = select.filter(health_record::Column::RecordDate.eq(record_date));
    }

    let rows = select
        .order_by_desc(health_record::Column::RecordDate)
        .order_by_desc(health_record::Column::RecordTime)
        .all(&db)
        .await?;
    let names = names_for(&db, &rows).await?;
    Ok(Json(
        rows.into_iter()
            .map(|r| HealthRecordResponse::from_parts(r, &names))
            .collect(),
    ))
}

/// GET /health-records/:id
pub async fn get_record(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(record_id): Path<i32>,
) -> Result<Json<HealthRecordResponse>, ApiError> {
    let record = find_scoped(&db, caller, record_id).await?;
    let names = names_for(&db, std::slice::from_ref(&record)).await?;
    Ok(Json(HealthRecordResponse::from_parts(record, &names)))
}

/// POST /health-records - date and time default to the moment of recording.
pub async fn create_record(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Json(payload): Json<CreateRecordRequest>,
) -> Result<Response, ApiError> {
    super::expect_role(&db, payload.senior_id, user::Role::Senior).await?;

    let now = chrono::Utc::now().naive_utc();
    let record = health_record::ActiveModel {
        senior_id: Set(payload.senior_id),
        record_date: Set(payload.record_date.unwrap_or_else(|| now.date())),
        record_time: Set(payload.record_time.unwrap_or_else(|| now.time())),
        blood_pressure_systolic: Set(payload.blood_pressure_systolic),
        blood_pressure_diastolic: Set(payload.blood_pressure_diastolic),
        heart_rate: Set(payload.heart_rate),
        temperature: Set(payload.temperature),
        blood_sugar: Set(payload.blood_sugar),
        oxygen_level: Set(payload.oxygen_level),
        weight: Set(payload.weight),
        recorded_by: Set(Some(caller.id)),
        notes: Set(payload.notes),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    info!(
        "Health record {} recorded for senior {} by user {}",
        record.id, record.senior_id, caller.id
    );
    let names = names_for(&db, std::slice::from_ref(&record)).await?;
    Ok((
        StatusCode::CREATED,
        Json(HealthRecordResponse::from_parts(record, &names)),
    )
        .into_response())
}

/// PATCH /health-records/:id
pub async fn update_record(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(record_id): Path<i32>,
    Json(payload): Json<UpdateRecordRequest>,
) -> Result<Json<HealthRecordResponse>, ApiError> {
    let record = find_scoped(&db, caller, record_id).await?;

    let mut active: health_record::ActiveModel = record.into();
    if let Some(record_date) = payload.record_date {
        active.record_date = Set(record_date);
    }
    if let Some(record_time) = payload.record_time {
        active.record_time = Set(record_time);
    }
    if let Some(systolic) = payload.blood_pressure_systolic {
        active.blood_pressure_systolic = Set(Some(systolic));
    }
    if let Some(diastolic) = payload.blood_pressure_diastolic {
        active.blood_pressure_diastolic = Set(Some(diastolic));
    }
    if let Some(heart_rate) = payload.heart_rate {
        active.heart_rate = Set(Some(heart_rate));
    }
    if let Some(temperature) = payload.temperature {
        active.temperature = Set(Some(temperature));
    }
    if let Some(blood_sugar) = payload.blood_sugar {
        active.blood_sugar = Set(Some(blood_sugar));
    }
    if let Some(oxygen_level) = payload.oxygen_level {
        active.oxygen_level = Set(Some(oxygen_level));
    }
    if let Some(weight) = payload.weight {
        active.weight = Set(Some(weight));
    }
    if let Some(notes) = payload.notes {
        active.notes = Set(Some(notes));
    }

    let record = active.update(&db).await?;
    let names = names_for(&db, std::slice::from_ref(&record)).await?;

    info!("Updated health record {}", record.id);
    Ok(Json(HealthRecordResponse::from_parts(record, &names)))
}

/// DELETE /health-records/:id
pub async fn delete_record(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(record_id): Path<i32>,
) -> Result<Response, ApiError> {
    let record = find_scoped(&db, caller, record_id).await?;
    record.delete(&db).await?;

    info!("Deleted health record {}", record_id);
    Ok((
        StatusCode::OK,
        Json(json!({"message": "Health record deleted"})),
    )
        .into_response())
}
