use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde_json::json;
use uuid::Uuid;

use crate::entities::{auth_token, prelude::*, user};

use super::error::{on_unique_violation, ApiError};
use super::middleware::CurrentUser;
use super::users::UserResponse;

#[derive(serde::Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password2: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub phone_number: Option<String>,
}

#[derive(serde::Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /auth/register - Create an account and hand out its token
pub async fn register(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Response, ApiError> {
    if payload.password != payload.password2 {
        return Err(ApiError::Validation("Passwords do not match".into()));
    }
    let role = user::Role::try_from_value(&payload.role)
        .map_err(|_| ApiError::Validation(format!("Unknown role: {}", payload.role)))?;

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("failed to hash password: {}", e)))?
        .to_string();

    let now = chrono::Utc::now().naive_utc();
    let account = user::ActiveModel {
        username: Set(payload.username),
        email: Set(payload.email),
        password_hash: Set(password_hash),
        first_name: Set(payload.first_name),
        last_name: Set(payload.last_name),
        role: Set(role),
        phone_number: Set(payload.phone_number),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await
    .map_err(|e| on_unique_violation(e, "A user with that username or email already exists"))?;

    let token = issue_token(&db, account.id).await?;

    tracing::Span::current()
        .record("table", "users")
        .record("action", "register_user")
        .record("user_id", account.id)
        .record("business_event", "user registered");

    metrics::counter!("seniorcare_users_registered_total").increment(1);
    metrics::gauge!("seniorcare_users_total").increment(1.0);

    Ok((
        StatusCode::CREATED,
        Json(json!({"user": UserResponse::from(account), "token": token})),
    )
        .into_response())
}

/// POST /auth/login - Verify credentials, return the user's token
pub async fn login(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let account = User::find()
        .filter(user::Column::Username.eq(payload.username.clone()))
        .one(&db)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".into()))?;

    let parsed_hash = PasswordHash::new(&account.password_hash)
        .map_err(|e| ApiError::Internal(format!("stored password hash is invalid: {}", e)))?;

    if Argon2::default()
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(ApiError::Unauthorized("Invalid username or password".into()));
    }
    if !account.is_active {
        return Err(ApiError::Unauthorized("User inactive or deleted".into()));
    }

    let token = issue_token(&db, account.id).await?;

    let mut active: user::ActiveModel = account.clone().into();
    active.last_active = Set(Some(chrono::Utc::now().naive_utc()));
    active.update(&db).await?;

    tracing::Span::current()
        .record("table", "users")
        .record("action", "login_user")
        .record("user_id", account.id)
        .record("business_event", "user logged in");

    Ok((
        StatusCode::OK,
        Json(json!({
            "token": token,
            "user_id": account.id,
            "username": account.username,
            "role": account.role,
        })),
    )
        .into_response())
}

/// POST /auth/logout - Invalidate the caller's token
pub async fn logout(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<Response, ApiError> {
    AuthToken::delete_many()
        .filter(auth_token::Column::UserId.eq(caller.id))
        .exec(&db)
        .await?;

    tracing::Span::current()
        .record("table", "auth_tokens")
        .record("action", "logout_user")
        .record("user_id", caller.id);

    Ok((StatusCode::OK, Json(json!({"message": "Logged out"}))).into_response())
}

/// One token per user: reuse the existing row if the user already holds one.
async fn issue_token(db: &DatabaseConnection, user_id: i32) -> Result<String, ApiError> {
    if let Some(existing) = AuthToken::find()
        .filter(auth_token::Column::UserId.eq(user_id))
        .one(db)
        .await?
    {
        return Ok(existing.key);
    }

    let token = auth_token::ActiveModel {
        key: Set(Uuid::new_v4().simple().to_string()),
        user_id: Set(user_id),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(token.key)
}
