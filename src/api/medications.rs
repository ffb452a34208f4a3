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

use crate::entities::medication::{self, Frequency};
use crate::entities::user;

use super::error::ApiError;
use super::middleware::CurrentUser;
use super::scope;

#[derive(Serialize)]
pub struct MedicationResponse {
    pub id: i32,
    pub senior_id: i32,
    pub senior_name: Option<String>,
    pub medication_name: String,
    pub dosage: String,
    pub frequency: Frequency,
    pub time_of_day: String,
    pub start_date: chrono::NaiveDate,
    pub end_date: Option<chrono::NaiveDate>,
    pub instructions: Option<String>,
    pub side_effects: Option<String>,
    pub is_active: bool,
    pub prescribed_by: Option<String>,
    pub prescription_date: Option<chrono::NaiveDate>,
    pub notes: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl MedicationResponse {
    fn from_parts(
        model: medication::Model,
        names: &std::collections::HashMap<i32, String>,
    ) -> Self {
        Self {
            id: model.id,
            senior_name: names.get(&model.senior_id).cloned(),
            senior_id: model.senior_id,
            medication_name: model.medication_name,
            dosage: model.dosage,
            frequency: model.frequency,
            time_of_day: model.time_of_day,
            start_date: model.start_date,
            end_date: model.end_date,
            instructions: model.instructions,
            side_effects: model.side_effects,
            is_active: model.is_active,
            prescribed_by: model.prescribed_by,
            prescription_date: model.prescription_date,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Deserialize)]
pub struct MedicationListParams {
    pub is_active: Option<bool>,
    pub senior: Option<i32>,
    pub frequency: Option<String>,
    pub search: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateMedicationRequest {
    pub senior_id: i32,
    pub medication_name: String,
    pub dosage: String,
    pub frequency: Frequency,
    pub time_of_day: String,
    pub start_date: chrono::NaiveDate,
    pub end_date: Option<chrono::NaiveDate>,
    pub instructions: Option<String>,
    pub side_effects: Option<String>,
    pub prescribed_by: Option<String>,
    pub prescription_date: Option<chrono::NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateMedicationRequest {
    pub medication_name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<Frequency>,
    pub time_of_day: Option<String>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub instructions: Option<String>,
    pub side_effects: Option<String>,
    pub is_active: Option<bool>,
    pub prescribed_by: Option<String>,
    pub prescription_date: Option<chrono::NaiveDate>,
    pub notes: Option<String>,
}

async fn find_scoped(
    db: &DatabaseConnection,
    caller: CurrentUser,
    medication_id: i32,
) -> Result<medication::Model, ApiError> {
    scope::medications(caller)
        .filter(medication::Column::Id.eq(medication_id))
        .one(db)
        .await?
        .ok_or(ApiError::NotFound("Medication"))
}

/// GET /medications
pub async fn list_medications(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Query(params): Query<MedicationListParams>,
) -> Result<Json<Vec<MedicationResponse>>, ApiError> {
    let mut select = scope::medications(caller);

    if let Some(is_active) = params.is_active {
        select = select.filter(medication::Column::IsActive.eq(is_active));
    }
    if let Some(senior) = params.senior {
        select = select.filter(medication::Column::SeniorId.eq(senior));
    }
    if let Some(frequency) = params.frequency {
        let frequency = Frequency::try_from_value(&frequency)
            .map_err(|_| ApiError::Validation(format!("Unknown frequency: {}", frequency)))?;
        select = select.filter(medication::Column::Frequency.eq(frequency));
    }
    if let Some(search) = params.search {
        select = select.filter(
            Condition::any()
                .add(medication::Column::MedicationName.contains(&search))
                .add(medication::Column::PrescribedBy.contains(&search)),
        );
    }

    let rows = select
        .order_by_asc(medication::Column::SeniorId)
        .order_by_asc(medication::Column::MedicationName)
        .all(&db)
        .await?;
    let names = super::user_name_map(&db, rows.iter().map(|m| m.senior_id)).await?;
    Ok(Json(
        rows.into_iter()
            .map(|m| MedicationResponse::from_parts(m, &names))
            .collect(),
    ))
}

/// GET /medications/active
pub async fn active(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<Json<Vec<MedicationResponse>>, ApiError> {
    let rows = scope::medications(caller)
        .filter(medication::Column::IsActive.eq(true))
        .order_by_asc(medication::Column::SeniorId)
        .order_by_asc(medication::Column::MedicationName)
        .all(&db)
        .await?;
    let names = super::user_name_map(&db, rows.iter().map(|m| m.senior_id)).await?;
    Ok(Json(
        rows.into_iter()
            .map(|m| MedicationResponse::from_parts(m, &names))
            .collect(),
    ))
}

/// GET /medications/:id
pub async fn get_medication(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(medication_id): Path<i32>,
) -> Result<Json<MedicationResponse>, ApiError> {
    let medication = find_scoped(&db, caller, medication_id).await?;
    let names = super::user_name_map(&db, [medication.senior_id]).await?;
    Ok(Json(MedicationResponse::from_parts(medication, &names)))
}

/// POST /medications
pub async fn create_medication(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Json(payload): Json<CreateMedicationRequest>,
) -> Result<Response, ApiError> {
    let senior = super::expect_role(&db, payload.senior_id, user::Role::Senior).await?;

    let now = chrono::Utc::now().naive_utc();
    let medication = medication::ActiveModel {
        senior_id: Set(payload.senior_id),
        medication_name: Set(payload.medication_name),
        dosage: Set(payload.dosage),
        frequency: Set(payload.frequency),
        time_of_day: Set(payload.time_of_day),
        start_date: Set(payload.start_date),
        end_date: Set(payload.end_date),
        instructions: Set(payload.instructions),
        side_effects: Set(payload.side_effects),
        is_active: Set(true),
        prescribed_by: Set(payload.prescribed_by),
        prescription_date: Set(payload.prescription_date),
        notes: Set(payload.notes),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    info!(
        "Medication {} added for senior {} by user {}",
        medication.id, medication.senior_id, caller.id
    );
    let names = std::collections::HashMap::from([(senior.id, senior.full_name())]);
    Ok((
        StatusCode::CREATED,
        Json(MedicationResponse::from_parts(medication, &names)),
    )
        .into_response())
}

/// PATCH /medications/:id
pub async fn update_medication(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(medication_id): Path<i32>,
    Json(payload): Json<UpdateMedicationRequest>,
) -> Result<Json<MedicationResponse>, ApiError> {
    let medication = find_scoped(&db, caller, medication_id).await?;

    let mut active: medication::ActiveModel = medication.into();
    if let Some(medication_name) = payload.medication_name {
        active.medication_name = Set(medication_name);
    }
    if let Some(dosage) = payload.dosage {
        active.dosage = Set(dosage);
    }
    if let Some(frequency) = payload.frequency {
        active.frequency = Set(frequency);
    }
    if let Some(time_of_day) = payload.time_of_day {
        active.time_of_day = Set(time_of_day);
    }
    if let Some(start_date) = payload.start_date {
        active.start_date = Set(start_date);
    }
    if let Some(end_date) = payload.end_date {
        active.end_date = Set(Some(end_date));
    }
    if let Some(instructions) = payload.instructions {
        active.instructions = Set(Some(instructions));
    }
    if let Some(side_effects) = payload.side_effects {
        active.side_effects = Set(Some(side_effects));
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(prescribed_by) = payload.prescribed_by {
        active.prescribed_by = Set(Some(prescribed_by));
    }
    if let Some(prescription_date) = payload.prescription_date {
        active.prescription_date = Set(Some(prescription_date));
    }
    if let Some(notes) = payload.notes {
        active.notes = Set(Some(notes));
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());

    let medication = active.update(&db).await?;
    let names = super::user_name_map(&db, [medication.senior_id]).await?;

    info!("Updated medication {}", medication.id);
    Ok(Json(MedicationResponse::from_parts(medication, &names)))
}

/// DELETE /medications/:id
pub async fn delete_medication(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(medication_id): Path<i32>,
) -> Result<Response, ApiError> {
    let medication = find_scoped(&db, caller, medication_id).await?;
    medication.delete(&db).await?;

    info!("Deleted medication {}", medication_id);
    Ok((
        StatusCode::OK,
        Json(json!({"message": "Medication deleted"})),
    )
        .into_response())
}
