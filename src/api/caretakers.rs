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

use crate::entities::{caretaker_profile, prelude::*, user};

use super::error::{on_unique_violation, ApiError};
use super::middleware::CurrentUser;
use super::users::UserResponse;

#[derive(Serialize)]
pub struct CaretakerProfileResponse {
    pub id: i32,
    pub user_id: i32,
    pub user: Option<UserResponse>,
    pub caretaker_name: Option<String>,
    pub years_of_experience: i32,
    pub certifications: Option<String>,
    pub specializations: Option<String>,
    pub is_available: bool,
    pub working_hours: String,
    pub employment_type: String,
    pub rating: f64,
    pub total_reviews: i32,
    pub background_check_completed: bool,
    pub background_check_date: Option<chrono::NaiveDate>,
    pub notes: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl CaretakerProfileResponse {
    fn from_pair(model: caretaker_profile::Model, account: Option<user::Model>) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            caretaker_name: account.as_ref().map(|u| u.full_name()),
            user: account.map(UserResponse::from),
            years_of_experience: model.years_of_experience,
            certifications: model.certifications,
            specializations: model.specializations,
            is_available: model.is_available,
            working_hours: model.working_hours,
            employment_type: model.employment_type,
            rating: model.rating,
            total_reviews: model.total_reviews,
            background_check_completed: model.background_check_completed,
            background_check_date: model.background_check_date,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Deserialize)]
pub struct CaretakerListParams {
    pub is_available: Option<bool>,
    pub employment_type: Option<String>,
    pub working_hours: Option<String>,
    pub background_check_completed: Option<bool>,
    pub search: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateCaretakerProfileRequest {
    pub user_id: i32,
    pub years_of_experience: Option<i32>,
    pub certifications: Option<String>,
    pub specializations: Option<String>,
    pub is_available: Option<bool>,
    pub working_hours: Option<String>,
    pub employment_type: Option<String>,
    pub background_check_completed: Option<bool>,
    pub background_check_date: Option<chrono::NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateCaretakerProfileRequest {
    pub years_of_experience: Option<i32>,
    pub certifications: Option<String>,
    pub specializations: Option<String>,
    pub is_available: Option<bool>,
    pub working_hours: Option<String>,
    pub employment_type: Option<String>,
    pub rating: Option<f64>,
    pub total_reviews: Option<i32>,
    pub background_check_completed: Option<bool>,
    pub background_check_date: Option<chrono::NaiveDate>,
    pub notes: Option<String>,
}

/// GET /caretakers
pub async fn list_profiles(
    Extension(db): Extension<DatabaseConnection>,
    Extension(_caller): Extension<CurrentUser>,
    Query(params): Query<CaretakerListParams>,
) -> Result<Json<Vec<CaretakerProfileResponse>>, ApiError> {
    let mut select = CaretakerProfile::find();

    if let Some(is_available) = params.is_available {
        select = select.filter(caretaker_profile::Column::IsAvailable.eq(is_available));
    }
    if let Some(employment_type) = params.employment_type {
        select = select.filter(caretaker_profile::Column::EmploymentType.eq(employment_type));
    }
    if let Some(working_hours) = params.working_hours {
        select = select.filter(caretaker_profile::Column::WorkingHours.eq(working_hours));
    }
    if let Some(completed) = params.background_check_completed {
        select = select.filter(caretaker_profile::Column::BackgroundCheckCompleted.eq(completed));
    }
    if let Some(search) = params.search {
        select = select.filter(caretaker_profile::Column::Specializations.contains(&search));
    }

    let rows = select
        .find_also_related(User)
        .order_by_asc(caretaker_profile::Column::Id)
        .all(&db)
        .await?;
    Ok(Json(
        rows.into_iter()
            .map(|(profile, account)| CaretakerProfileResponse::from_pair(profile, account))
            .collect(),
    ))
}

/// GET /caretakers/available - caretakers currently open for assignments.
pub async fn available(
    Extension(db): Extension<DatabaseConnection>,
) -> Result<Json<Vec<CaretakerProfileResponse>>, ApiError> {
    let rows = CaretakerProfile::find()
        .filter(caretaker_profile::Column::IsAvailable.eq(true))
        .find_also_related(User)
        .order_by_asc(caretaker_profile::Column::Id)
        .all(&db)
        .await?;
    Ok(Json(
        rows.into_iter()
            .map(|(profile, account)| CaretakerProfileResponse::from_pair(profile, account))
            .collect(),
    ))
}

/// GET /caretakers/:id
pub async fn get_profile(
    Extension(db): Extension<DatabaseConnection>,
    Path(profile_id): Path<i32>,
) -> Result<Json<CaretakerProfileResponse>, ApiError> {
    let (profile, account) = CaretakerProfile::find_by_id(profile_id)
        .find_also_related(User)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Caretaker profile"))?;
    Ok(Json(CaretakerProfileResponse::from_pair(profile, account)))
}

/// POST /caretakers
pub async fn create_profile(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Json(payload): Json<CreateCaretakerProfileRequest>,
) -> Result<Response, ApiError> {
    let account = super::expect_role(&db, payload.user_id, user::Role::Caretaker).await?;

    let now = chrono::Utc::now().naive_utc();
    let profile = caretaker_profile::ActiveModel {
        user_id: Set(payload.user_id),
        years_of_experience: Set(payload.years_of_experience.unwrap_or(0)),
        certifications: Set(payload.certifications),
        specializations: Set(payload.specializations),
        is_available: Set(payload.is_available.unwrap_or(true)),
        working_hours: Set(payload.working_hours.unwrap_or_else(|| "full_time".into())),
        employment_type: Set(payload.employment_type.unwrap_or_else(|| "staff".into())),
        rating: Set(0.0),
        total_reviews: Set(0),
        background_check_completed: Set(payload.background_check_completed.unwrap_or(false)),
        background_check_date: Set(payload.background_check_date),
        notes: Set(payload.notes),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await
    .map_err(|e| on_unique_violation(e, "That user already has a caretaker profile"))?;

    info!(
        "Caretaker profile {} created for user {} by {}",
        profile.id, profile.user_id, caller.id
    );
    Ok((
        StatusCode::CREATED,
        Json(CaretakerProfileResponse::from_pair(profile, Some(account))),
    )
        .into_response())
}

/// PATCH /caretakers/:id - the owning user id is immutable.
pub async fn update_profile(
    Extension(db): Extension<DatabaseConnection>,
    Path(profile_id): Path<i32>,
    Json(payload): Json<UpdateCaretakerProfileRequest>,
) -> Result<Json<CaretakerProfileResponse>, ApiError> {
    let profile = CaretakerProfile::find_by_id(profile_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Caretaker profile"))?;

    let mut active: caretaker_profile::ActiveModel = profile.into();
    if let Some(years) = payload.years_of_experience {
        active.years_of_experience = Set(years);
    }
    if let Some(certifications) = payload.certifications {
        active.certifications = Set(Some(certifications));
    }
    if let Some(specializations) = payload.specializations {
        active.specializations = Set(Some(specializations));
    }
    if let Some(is_available) = payload.is_available {
        active.is_available = Set(is_available);
    }
    if let Some(working_hours) = payload.working_hours {
        active.working_hours = Set(working_hours);
    }
    if let Some(employment_type) = payload.employment_type {
        active.employment_type = Set(employment_type);
    }
    if let Some(rating) = payload.rating {
        active.rating = Set(rating);
    }
    if let Some(total_reviews) = payload.total_reviews {
        active.total_reviews = Set(total_reviews);
    }
    if let Some(completed) = payload.background_check_completed {
        active.background_check_completed = Set(completed);
    }
    if let Some(date) = payload.background_check_date {
        active.background_check_date = Set(Some(date));
    }
    if let Some(notes) = payload.notes {
        active.notes = Set(Some(notes));
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());

    let profile = active.update(&db).await?;
    let account = profile.find_related(User).one(&db).await?;

    info!("Updated caretaker profile {}", profile.id);
    Ok(Json(CaretakerProfileResponse::from_pair(profile, account)))
}

/// DELETE /caretakers/:id
pub async fn delete_profile(
    Extension(db): Extension<DatabaseConnection>,
    Path(profile_id): Path<i32>,
) -> Result<Response, ApiError> {
    let profile = CaretakerProfile::find_by_id(profile_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Caretaker profile"))?;
    profile.delete(&db).await?;

    info!("Deleted caretaker profile {}", profile_id);
    Ok((
        StatusCode::OK,
        Json(json!({"message": "Caretaker profile deleted"})),
    )
        .into_response())
}
