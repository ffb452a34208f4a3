use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::entities::{prelude::*, senior_profile, user};

use super::error::{on_unique_violation, ApiError};
use super::middleware::CurrentUser;
use super::users::UserResponse;

/// Senior care profile with its account embedded.
#[derive(Serialize)]
pub struct SeniorProfileResponse {
    pub id: i32,
    pub user_id: i32,
    pub user: Option<UserResponse>,
    pub senior_name: Option<String>,
    pub blood_group: Option<String>,
    pub medical_conditions: Option<String>,
    pub allergies: Option<String>,
    pub current_medications: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_relation: Option<String>,
    pub living_arrangement: String,
    pub mobility_level: String,
    pub care_level_needed: String,
    pub notes: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl SeniorProfileResponse {
    fn from_pair(model: senior_profile::Model, account: Option<user::Model>) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            senior_name: account.as_ref().map(|u| u.full_name()),
            user: account.map(UserResponse::from),
            blood_group: model.blood_group,
            medical_conditions: model.medical_conditions,
            allergies: model.allergies,
            current_medications: model.current_medications,
            emergency_contact_name: model.emergency_contact_name,
            emergency_contact_phone: model.emergency_contact_phone,
            emergency_contact_relation: model.emergency_contact_relation,
            living_arrangement: model.living_arrangement,
            mobility_level: model.mobility_level,
            care_level_needed: model.care_level_needed,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Deserialize)]
pub struct SeniorListParams {
    pub blood_group: Option<String>,
    pub living_arrangement: Option<String>,
    pub mobility_level: Option<String>,
    pub care_level_needed: Option<String>,
    pub search: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateSeniorProfileRequest {
    pub user_id: i32,
    pub blood_group: Option<String>,
    pub medical_conditions: Option<String>,
    pub allergies: Option<String>,
    pub current_medications: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_relation: Option<String>,
    pub living_arrangement: Option<String>,
    pub mobility_level: Option<String>,
    pub care_level_needed: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateSeniorProfileRequest {
    pub blood_group: Option<String>,
    pub medical_conditions: Option<String>,
    pub allergies: Option<String>,
    pub current_medications: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_relation: Option<String>,
    pub living_arrangement: Option<String>,
    pub mobility_level: Option<String>,
    pub care_level_needed: Option<String>,
    pub notes: Option<String>,
}

/// GET /seniors
pub async fn list_profiles(
    Extension(db): Extension<DatabaseConnection>,
    Extension(_caller): Extension<CurrentUser>,
    Query(params): Query<SeniorListParams>,
) -> Result<Json<Vec<SeniorProfileResponse>>, ApiError> {
    let mut select = SeniorProfile::find();

    if let Some(blood_group) = params.blood_group {
        select = select.filter(senior_profile::Column::BloodGroup.eq(blood_group));
    }
    if let Some(living_arrangement) = params.living_arrangement {
        select = select.filter(senior_profile::Column::LivingArrangement.eq(living_arrangement));
    }
    if let Some(mobility_level) = params.mobility_level {
        select = select.filter(senior_profile::Column::MobilityLevel.eq(mobility_level));
    }
    if let Some(care_level_needed) = params.care_level_needed {
        select = select.filter(senior_profile::Column::CareLevelNeeded.eq(care_level_needed));
    }
    if let Some(search) = params.search {
        select = select.filter(senior_profile::Column::EmergencyContactName.contains(&search));
    }

    let rows = select
        .find_also_related(User)
        .order_by_asc(senior_profile::Column::Id)
        .all(&db)
        .await?;
    Ok(Json(
        rows.into_iter()
            .map(|(profile, account)| SeniorProfileResponse::from_pair(profile, account))
            .collect(),
    ))
}

/// GET /seniors/:id
pub async fn get_profile(
    Extension(db): Extension<DatabaseConnection>,
    Path(profile_id): Path<i32>,
) -> Result<Json<SeniorProfileResponse>, ApiError> {
    let (profile, account) = SeniorProfile::find_by_id(profile_id)
        .find_also_related(User)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Senior profile"))?;
    Ok(Json(SeniorProfileResponse::from_pair(profile, account)))
}

/// POST /seniors
pub async fn create_profile(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Json(payload): Json<CreateSeniorProfileRequest>,
) -> Result<Response, ApiError> {
    let account = super::expect_role(&db, payload.user_id, user::Role::Senior).await?;

    let now = chrono::Utc::now().naive_utc();
    let profile = senior_profile::ActiveModel {
        user_id: Set(payload.user_id),
        blood_group: Set(payload.blood_group),
        medical_conditions: Set(payload.medical_conditions),
        allergies: Set(payload.allergies),
        current_medications: Set(payload.current_medications),
        emergency_contact_name: Set(payload.emergency_contact_name),
        emergency_contact_phone: Set(payload.emergency_contact_phone),
        emergency_contact_relation: Set(payload.emergency_contact_relation),
        living_arrangement: Set(payload.living_arrangement.unwrap_or_else(|| "alone".into())),
        mobility_level: Set(payload
            .mobility_level
            .unwrap_or_else(|| "independent".into())),
        care_level_needed: Set(payload.care_level_needed.unwrap_or_else(|| "minimal".into())),
        notes: Set(payload.notes),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await
    .map_err(|e| on_unique_violation(e, "That user already has a senior profile"))?;

    info!(
        "Senior profile {} created for user {} by {}",
        profile.id, profile.user_id, caller.id
    );
    Ok((
        StatusCode::CREATED,
        Json(SeniorProfileResponse::from_pair(profile, Some(account))),
    )
        .into_response())
}

/// PATCH /seniors/:id - the owning user id is immutable.
pub async fn update_profile(
    Extension(db): Extension<DatabaseConnection>,
    Path(profile_id): Path<i32>,
    Json(payload): Json<UpdateSeniorProfileRequest>,
) -> Result<Json<SeniorProfileResponse>, ApiError> {
    let profile = SeniorProfile::find_by_id(profile_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Senior profile"))?;

    let mut active: senior_profile::ActiveModel = profile.into();
    if let Some(blood_group) = payload.blood_group {
        active.blood_group = Set(Some(blood_group));
    }
    if let Some(medical_conditions) = payload.medical_conditions {
        active.medical_conditions = Set(Some(medical_conditions));
    }
    if let Some(allergies) = payload.allergies {
        active.allergies = Set(Some(allergies));
    }
    if let Some(current_medications) = payload.current_medications {
        active.current_medications = Set(Some(current_medications));
    }
    if let Some(name) = payload.emergency_contact_name {
        active.emergency_contact_name = Set(Some(name));
    }
    if let Some(phone) = payload.emergency_contact_phone {
        active.emergency_contact_phone = Set(Some(phone));
    }
    if let Some(relation) = payload.emergency_contact_relation {
        active.emergency_contact_relation = Set(Some(relation));
    }
    if let Some(living_arrangement) = payload.living_arrangement {
        active.living_arrangement = Set(living_arrangement);
    }
    if let Some(mobility_level) = payload.mobility_level {
        active.mobility_level = Set(mobility_level);
    }
    if let Some(care_level_needed) = payload.care_level_needed {
        active.care_level_needed = Set(care_level_needed);
    }
    if let Some(notes) = payload.notes {
        active.notes = Set(Some(notes));
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());

    let profile = active.update(&db).await?;
    let account = profile.find_related(User).one(&db).await?;

    info!("Updated senior profile {}", profile.id);
    Ok(Json(SeniorProfileResponse::from_pair(profile, account)))
}

/// DELETE /seniors/:id
pub async fn delete_profile(
    Extension(db): Extension<DatabaseConnection>,
    Path(profile_id): Path<i32>,
) -> Result<Response, ApiError> {
    let profile = SeniorProfile::find_by_id(profile_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Senior profile"))?;
    profile.delete(&db).await?;

    info!("Deleted senior profile {}", profile_id);
    Ok((
        StatusCode::OK,
        Json(json!({"message": "Senior profile deleted"})),
    )
        .into_response())
}
