use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::entities::{ngo, prelude::*, user, volunteer_profile};

use super::error::{on_unique_violation, ApiError};
use super::middleware::CurrentUser;

#[derive(Serialize)]
pub struct NgoResponse {
    pub id: i32,
    pub name: String,
    pub registration_number: String,
    pub email: String,
    pub phone_number: String,
    pub website: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub description: Option<String>,
    pub mission: Option<String>,
    pub admin_id: Option<i32>,
    pub admin_name: Option<String>,
    pub volunteer_count: u64,
    pub is_verified: bool,
    pub is_active: bool,
    pub established_date: Option<chrono::NaiveDate>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl NgoResponse {
    fn from_parts(model: ngo::Model, admin_name: Option<String>, volunteer_count: u64) -> Self {
        Self {
            id: model.id,
            name: model.name,
            registration_number: model.registration_number,
            email: model.email,
            phone_number: model.phone_number,
            website: model.website,
            address: model.address,
            city: model.city,
            state: model.state,
            zip_code: model.zip_code,
            description: model.description,
            mission: model.mission,
            admin_id: model.admin_id,
            admin_name,
            volunteer_count,
            is_verified: model.is_verified,
            is_active: model.is_active,
            established_date: model.established_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Deserialize)]
pub struct NgoListParams {
    pub is_verified: Option<bool>,
    pub is_active: Option<bool>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub search: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateNgoRequest {
    pub name: String,
    pub registration_number: String,
    pub email: String,
    pub phone_number: String,
    pub website: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub description: Option<String>,
    pub mission: Option<String>,
    pub admin_id: Option<i32>,
    pub established_date: Option<chrono::NaiveDate>,
}

#[derive(Deserialize)]
pub struct UpdateNgoRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub description: Option<String>,
    pub mission: Option<String>,
    pub admin_id: Option<i32>,
    pub is_active: Option<bool>,
    pub established_date: Option<chrono::NaiveDate>,
}

async fn volunteer_count(db: &DatabaseConnection, ngo_id: i32) -> Result<u64, ApiError> {
    let count = VolunteerProfile::find()
        .filter(volunteer_profile::Column::NgoId.eq(ngo_id))
        .count(db)
        .await?;
    Ok(count)
}

/// GET /ngos
pub async fn list_ngos(
    Extension(db): Extension<DatabaseConnection>,
    Extension(_caller): Extension<CurrentUser>,
    Query(params): Query<NgoListParams>,
) -> Result<Json<Vec<NgoResponse>>, ApiError> {
    let mut select = Ngo::find();

    if let Some(is_verified) = params.is_verified {
        select = select.filter(ngo::Column::IsVerified.eq(is_verified));
    }
    if let Some(is_active) = params.is_active {
        select = select.filter(ngo::Column::IsActive.eq(is_active));
    }
    if let Some(state) = params.state {
        select = select.filter(ngo::Column::State.eq(state));
    }
    if let Some(city) = params.city {
        select = select.filter(ngo::Column::City.eq(city));
    }
    if let Some(search) = params.search {
        select = select.filter(
            Condition::any()
                .add(ngo::Column::Name.contains(&search))
                .add(ngo::Column::RegistrationNumber.contains(&search))
                .add(ngo::Column::Email.contains(&search)),
        );
    }

    let rows = select.order_by_asc(ngo::Column::Name).all(&db).await?;
    let admin_names =
        super::user_name_map(&db, rows.iter().filter_map(|n| n.admin_id)).await?;

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let admin_name = row.admin_id.and_then(|id| admin_names.get(&id).cloned());
        let count = volunteer_count(&db, row.id).await?;
        out.push(NgoResponse::from_parts(row, admin_name, count));
    }
    Ok(Json(out))
}

/// GET /ngos/:id
pub async fn get_ngo(
    Extension(db): Extension<DatabaseConnection>,
    Path(ngo_id): Path<i32>,
) -> Result<Json<NgoResponse>, ApiError> {
    let row = Ngo::find_by_id(ngo_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("NGO"))?;
    let admin_names = super::user_name_map(&db, row.admin_id).await?;
    let admin_name = row.admin_id.and_then(|id| admin_names.get(&id).cloned());
    let count = volunteer_count(&db, row.id).await?;
    Ok(Json(NgoResponse::from_parts(row, admin_name, count)))
}

/// POST /ngos
pub async fn create_ngo(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Json(payload): Json<CreateNgoRequest>,
) -> Result<Response, ApiError> {
    let admin_name = match payload.admin_id {
        Some(admin_id) => {
            let admin = super::expect_role(&db, admin_id, user::Role::NgoAdmin).await?;
            Some(admin.full_name())
        }
        None => None,
    };

    let now = chrono::Utc::now().naive_utc();
    let row = ngo::ActiveModel {
        name: Set(payload.name),
        registration_number: Set(payload.registration_number),
        email: Set(payload.email),
        phone_number: Set(payload.phone_number),
        website: Set(payload.website),
        address: Set(payload.address),
        city: Set(payload.city),
        state: Set(payload.state),
        zip_code: Set(payload.zip_code),
        description: Set(payload.description),
        mission: Set(payload.mission),
        admin_id: Set(payload.admin_id),
        is_verified: Set(false),
        is_active: Set(true),
        established_date: Set(payload.established_date),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await
    .map_err(|e| on_unique_violation(e, "An NGO with that registration number already exists"))?;

    info!("NGO {} registered by user {}", row.id, caller.id);
    metrics::gauge!("seniorcare_ngos_total").increment(1.0);
    Ok((
        StatusCode::CREATED,
        Json(NgoResponse::from_parts(row, admin_name, 0)),
    )
        .into_response())
}

/// PATCH /ngos/:id - verification only moves through the verify action.
pub async fn update_ngo(
    Extension(db): Extension<DatabaseConnection>,
    Path(ngo_id): Path<i32>,
    Json(payload): Json<UpdateNgoRequest>,
) -> Result<Json<NgoResponse>, ApiError> {
    let row = Ngo::find_by_id(ngo_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("NGO"))?;

    let mut active: ngo::ActiveModel = row.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(email) = payload.email {
        active.email = Set(email);
    }
    if let Some(phone_number) = payload.phone_number {
        active.phone_number = Set(phone_number);
    }
    if let Some(website) = payload.website {
        active.website = Set(Some(website));
    }
    if let Some(address) = payload.address {
        active.address = Set(address);
    }
    if let Some(city) = payload.city {
        active.city = Set(city);
    }
    if let Some(state) = payload.state {
        active.state = Set(state);
    }
    if let Some(zip_code) = payload.zip_code {
        active.zip_code = Set(zip_code);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(mission) = payload.mission {
        active.mission = Set(Some(mission));
    }
    if let Some(admin_id) = payload.admin_id {
        super::expect_role(&db, admin_id, user::Role::NgoAdmin).await?;
        active.admin_id = Set(Some(admin_id));
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(established_date) = payload.established_date {
        active.established_date = Set(Some(established_date));
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());

    let row = active.update(&db).await?;
    let admin_names = super::user_name_map(&db, row.admin_id).await?;
    let admin_name = row.admin_id.and_then(|id| admin_names.get(&id).cloned());
    let count = volunteer_count(&db, row.id).await?;

    info!("Updated NGO {}", row.id);
    Ok(Json(NgoResponse::from_parts(row, admin_name, count)))
}

/// DELETE /ngos/:id
pub async fn delete_ngo(
    Extension(db): Extension<DatabaseConnection>,
    Path(ngo_id): Path<i32>,
) -> Result<Response, ApiError> {
    let row = Ngo::find_by_id(ngo_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("NGO"))?;
    row.delete(&db).await?;

    info!("Deleted NGO {}", ngo_id);
    metrics::gauge!("seniorcare_ngos_total").decrement(1.0);
    Ok((StatusCode::OK, Json(json!({"message": "NGO deleted"}))).into_response())
}

/// POST /ngos/:id/verify - senior admins only.
pub async fn verify_ngo(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(ngo_id): Path<i32>,
) -> Result<Response, ApiError> {
    if caller.role != user::Role::SeniorAdmin {
        return Err(ApiError::Forbidden(
            "Only senior admins can verify NGOs".into(),
        ));
    }
    let row = Ngo::find_by_id(ngo_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("NGO"))?;

    let mut active: ngo::ActiveModel = row.into();
    active.is_verified = Set(true);
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    active.update(&db).await?;

    info!("NGO {} verified by user {}", ngo_id, caller.id);
    Ok((
        StatusCode::OK,
        Json(json!({"message": "NGO verified successfully."})),
    )
        .into_response())
}
