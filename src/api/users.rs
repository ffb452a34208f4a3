use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::entities::{prelude::*, user};

use super::error::{on_unique_violation, ApiError};
use super::middleware::CurrentUser;

/// Explicit projection of a user row. `password_hash` never leaves the
/// database through this struct.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub role: user::Role,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub is_active: bool,
    pub last_active: Option<chrono::NaiveDateTime>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        let full_name = model.full_name();
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            full_name,
            role: model.role,
            phone_number: model.phone_number,
            date_of_birth: model.date_of_birth,
            address: model.address,
            city: model.city,
            state: model.state,
            zip_code: model.zip_code,
            is_active: model.is_active,
            last_active: model.last_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Deserialize)]
pub struct UserListParams {
    pub role: Option<String>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

/// GET /users
pub async fn list_users(
    Extension(db): Extension<DatabaseConnection>,
    Extension(_caller): Extension<CurrentUser>,
    Query(params): Query<UserListParams>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let mut select = User::find();

    if let Some(role) = params.role {
        let role = user::Role::try_from_value(&role)
            .map_err(|_| ApiError::Validation(format!("Unknown role: {}", role)))?;
        select = select.filter(user::Column::Role.eq(role));
    }
    if let Some(is_active) = params.is_active {
        select = select.filter(user::Column::IsActive.eq(is_active));
    }
    if let Some(search) = params.search {
        select = select.filter(
            Condition::any()
                .add(user::Column::Username.contains(&search))
                .add(user::Column::Email.contains(&search))
                .add(user::Column::FirstName.contains(&search))
                .add(user::Column::LastName.contains(&search))
                .add(user::Column::PhoneNumber.contains(&search)),
        );
    }

    let rows = select.order_by_asc(user::Column::Id).all(&db).await?;
    Ok(Json(rows.into_iter().map(UserResponse::from).collect()))
}

/// GET /users/me
pub async fn me(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<Json<UserResponse>, ApiError> {
    let account = User::find_by_id(caller.id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(Json(account.into()))
}

/// GET /users/:id
pub async fn get_user(
    Extension(db): Extension<DatabaseConnection>,
    Path(user_id): Path<i32>,
) -> Result<Json<UserResponse>, ApiError> {
    let account = User::find_by_id(user_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(Json(account.into()))
}

/// PATCH /users/:id - Self or admin. Role is immutable after creation.
pub async fn update_user(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(user_id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let account = writable_user(&db, caller, user_id).await?;

    let mut active: user::ActiveModel = account.into();
    if let Some(username) = payload.username {
        active.username = Set(username);
    }
    if let Some(email) = payload.email {
        active.email = Set(email);
    }
    if let Some(first_name) = payload.first_name {
        active.first_name = Set(first_name);
    }
    if let Some(last_name) = payload.last_name {
        active.last_name = Set(last_name);
    }
    if let Some(phone_number) = payload.phone_number {
        active.phone_number = Set(Some(phone_number));
    }
    if let Some(date_of_birth) = payload.date_of_birth {
        active.date_of_birth = Set(Some(date_of_birth));
    }
    if let Some(address) = payload.address {
        active.address = Set(Some(address));
    }
    if let Some(city) = payload.city {
        active.city = Set(Some(city));
    }
    if let Some(state) = payload.state {
        active.state = Set(Some(state));
    }
    if let Some(zip_code) = payload.zip_code {
        active.zip_code = Set(Some(zip_code));
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());

    let account = active
        .update(&db)
        .await
        .map_err(|e| on_unique_violation(e, "A user with that username or email already exists"))?;

    info!("Updated user {}", account.id);
    Ok(Json(account.into()))
}

/// DELETE /users/:id - Self or admin.
pub async fn delete_user(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(user_id): Path<i32>,
) -> Result<Response, ApiError> {
    let account = writable_user(&db, caller, user_id).await?;
    account.delete(&db).await?;

    info!("Deleted user {}", user_id);
    metrics::gauge!("seniorcare_users_total").decrement(1.0);
    Ok((StatusCode::OK, Json(json!({"message": "User deleted"}))).into_response())
}

/// POST /users/:id/activate - Admin roles only.
pub async fn activate_user(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(user_id): Path<i32>,
) -> Result<Response, ApiError> {
    set_active_flag(&db, caller, user_id, true).await?;
    Ok((
        StatusCode::OK,
        Json(json!({"message": "User activated successfully."})),
    )
        .into_response())
}

/// POST /users/:id/deactivate - Admin roles only.
pub async fn deactivate_user(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(user_id): Path<i32>,
) -> Result<Response, ApiError> {
    set_active_flag(&db, caller, user_id, false).await?;
    Ok((
        StatusCode::OK,
        Json(json!({"message": "User deactivated successfully."})),
    )
        .into_response())
}

async fn set_active_flag(
    db: &DatabaseConnection,
    caller: CurrentUser,
    user_id: i32,
    is_active: bool,
) -> Result<(), ApiError> {
    if !caller.role.is_admin() {
        return Err(ApiError::Forbidden(
            "Only admins can change account status".into(),
        ));
    }
    let account = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    let mut active: user::ActiveModel = account.into();
    active.is_active = Set(is_active);
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    active.update(db).await?;

    info!("Set user {} active={}", user_id, is_active);
    Ok(())
}

/// Update/delete on a user row is allowed for the row's owner or an admin.
async fn writable_user(
    db: &DatabaseConnection,
    caller: CurrentUser,
    user_id: i32,
) -> Result<user::Model, ApiError> {
    let account = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    if caller.id == user_id || caller.role.is_admin() {
        Ok(account)
    } else {
        Err(ApiError::Forbidden("Not your account".into()))
    }
}
