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

use crate::entities::{prelude::*, user, volunteer_profile};

use super::error::{on_unique_violation, ApiError};
use super::middleware::CurrentUser;
use super::users::UserResponse;

#[derive(Serialize)]
pub struct VolunteerProfileResponse {
    pub id: i32,
    pub user_id: i32,
    pub user: Option<UserResponse>,
    pub volunteer_name: Option<String>,
    pub ngo_id: i32,
    pub ngo_name: Option<String>,
    pub volunteer_code: String,
    pub join_date: chrono::NaiveDate,
    pub is_available: bool,
    pub availability_hours: String,
    pub skills: Option<String>,
    pub interests: Option<String>,
    pub total_hours: f64,
    pub seniors_helped: i32,
    pub tasks_completed: i32,
    pub rating: f64,
    pub total_reviews: i32,
    pub background_check_completed: bool,
    pub background_check_date: Option<chrono::NaiveDate>,
    pub notes: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl VolunteerProfileResponse {
    fn from_parts(
        model: volunteer_profile::Model,
        account: Option<user::Model>,
        ngo_name: Option<String>,
    ) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            volunteer_name: account.as_ref().map(|u| u.full_name()),
            user: account.map(UserResponse::from),
            ngo_id: model.ngo_id,
            ngo_name,
            volunteer_code: model.volunteer_code,
            join_date: model.join_date,
            is_available: model.is_available,
            availability_hours: model.availability_hours,
            skills: model.skills,
            interests: model.interests,
            total_hours: model.total_hours,
            seniors_helped: model.seniors_helped,
            tasks_completed: model.tasks_completed,
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
pub struct VolunteerListParams {
    pub ngo: Option<i32>,
    pub is_available: Option<bool>,
    pub availability_hours: Option<String>,
    pub background_check_completed: Option<bool>,
    pub search: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateVolunteerProfileRequest {
    pub user_id: i32,
    pub ngo_id: i32,
    pub volunteer_code: String,
    pub join_date: Option<chrono::NaiveDate>,
    pub is_available: Option<bool>,
    pub availability_hours: Option<String>,
    pub skills: Option<String>,
    pub interests: Option<String>,
    pub background_check_completed: Option<bool>,
    pub background_check_date: Option<chrono::NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateVolunteerProfileRequest {
    pub is_available: Option<bool>,
    pub availability_hours: Option<String>,
    pub skills: Option<String>,
    pub interests: Option<String>,
    pub background_check_completed: Option<bool>,
    pub background_check_date: Option<chrono::NaiveDate>,
    pub notes: Option<String>,
}

/// GET /volunteers
pub async fn list_profiles(
    Extension(db): Extension<DatabaseConnection>,
    Extension(_caller): Extension<CurrentUser>,
    Query(params): Query<VolunteerListParams>,
) -> Result<Json<Vec<VolunteerProfileResponse>>, ApiError> {
    let mut select = VolunteerProfile::find();

    if let Some(ngo) = params.ngo {
        select = select.filter(volunteer_profile::Column::NgoId.eq(ngo));
    }
    if let Some(is_available) = params.is_available {
        select = select.filter(volunteer_profile::Column::IsAvailable.eq(is_available));
    }
    if let Some(availability_hours) = params.availability_hours {
        select =
            select.filter(volunteer_profile::Column::AvailabilityHours.eq(availability_hours));
    }
    if let Some(completed) = params.background_check_completed {
        select = select.filter(volunteer_profile::Column::BackgroundCheckCompleted.eq(completed));
    }
    if let Some(search) = params.search {
        select = select.filter(volunteer_profile::Column::VolunteerCode.contains(&search));
    }

    let rows = select
        .find_also_related(User)
        .order_by_asc(volunteer_profile::Column::Id)
        .all(&db)
        .await?;
    let ngo_names = super::ngo_name_map(&db, rows.iter().map(|(p, _)| p.ngo_id)).await?;
    Ok(Json(
        rows.into_iter()
            .map(|(profile, account)| {
                let ngo_name = ngo_names.get(&profile.ngo_id).cloned();
                VolunteerProfileResponse::from_parts(profile, account, ngo_name)
            })
            .collect(),
    ))
}

/// GET /volunteers/my-stats - the caller's own volunteering counters.
pub async fn my_stats(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let profile = VolunteerProfile::find()
        .filter(volunteer_profile::Column::UserId.eq(caller.id))
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Volunteer profile"))?;
    Ok(Json(json!({
        "total_hours": profile.total_hours,
        "seniors_helped": profile.seniors_helped,
        "tasks_completed": profile.tasks_completed,
        "rating": profile.rating,
    })))
}

/// GET /volunteers/:id
pub async fn get_profile(
    Extension(db): Extension<DatabaseConnection>,
    Path(profile_id): Path<i32>,
) -> Result<Json<VolunteerProfileResponse>, ApiError> {
    let (profile, account) = VolunteerProfile::find_by_id(profile_id)
        .find_also_related(User)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Volunteer profile"))?;
    let ngo_names = super::ngo_name_map(&db, [profile.ngo_id]).await?;
    let ngo_name = ngo_names.get(&profile.ngo_id).cloned();
    Ok(Json(VolunteerProfileResponse::from_parts(
        profile, account, ngo_name,
    )))
}

/// POST /volunteers
pub async fn create_profile(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Json(payload): Json<CreateVolunteerProfileRequest>,
) -> Result<Response, ApiError> {
    let account = super::expect_role(&db, payload.user_id, user::Role::Volunteer).await?;
    let ngo = Ngo::find_by_id(payload.ngo_id)
        .one(&db)
        .await?
        .ok_or_else(|| ApiError::Validation(format!("NGO {} does not exist", payload.ngo_id)))?;

    let now = chrono::Utc::now().naive_utc();
    let profile = volunteer_profile::ActiveModel {
        user_id: Set(payload.user_id),
        ngo_id: Set(payload.ngo_id),
        volunteer_code: Set(payload.volunteer_code),
        join_date: Set(payload.join_date.unwrap_or_else(|| now.date())),
        is_available: Set(payload.is_available.unwrap_or(true)),
        availability_hours: Set(payload
            .availability_hours
            .unwrap_or_else(|| "flexible".into())),
        skills: Set(payload.skills),
        interests: Set(payload.interests),
        total_hours: Set(0.0),
        seniors_helped: Set(0),
        tasks_completed: Set(0),
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
    .map_err(|e| {
        on_unique_violation(
            e,
            "That user already has a volunteer profile or the volunteer code is taken",
        )
    })?;

    info!(
        "Volunteer profile {} created for user {} by {}",
        profile.id, profile.user_id, caller.id
    );
    Ok((
        StatusCode::CREATED,
        Json(VolunteerProfileResponse::from_parts(
            profile,
            Some(account),
            Some(ngo.name),
        )),
    )
        .into_response())
}

/// PATCH /volunteers/:id - user, NGO, code, and counters are immutable here;
/// the counters move through task completion.
pub async fn update_profile(
    Extension(db): Extension<DatabaseConnection>,
    Path(profile_id): Path<i32>,
    Json(payload): Json<UpdateVolunteerProfileRequest>,
) -> Result<Json<VolunteerProfileResponse>, ApiError> {
    let profile = VolunteerProfile::find_by_id(profile_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Volunteer profile"))?;

    let mut active: volunteer_profile::ActiveModel = profile.into();
    if let Some(is_available) = payload.is_available {
        active.is_available = Set(is_available);
    }
    if let Some(availability_hours) = payload.availability_hours {
        active.availability_hours = Set(availability_hours);
    }
    if let Some(skills) = payload.skills {
        active.skills = Set(Some(skills));
    }
    if let Some(interests) = payload.interests {
        active.interests = Set(Some(interests));
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
    let ngo_names = super::ngo_name_map(&db, [profile.ngo_id]).await?;
    let ngo_name = ngo_names.get(&profile.ngo_id).cloned();

    info!("Updated volunteer profile {}", profile.id);
    Ok(Json(VolunteerProfileResponse::from_parts(
        profile, account, ngo_name,
    )))
}

/// DELETE /volunteers/:id
pub async fn delete_profile(
    Extension(db): Extension<DatabaseConnection>,
    Path(profile_id): Path<i32>,
) -> Result<Response, ApiError> {
    let profile = VolunteerProfile::find_by_id(profile_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Volunteer profile"))?;
    profile.delete(&db).await?;

    info!("Deleted volunteer profile {}", profile_id);
    Ok((
        StatusCode::OK,
        Json(json!({"message": "Volunteer profile deleted"})),
    )
        .into_response())
}
