use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::entities::{notification, prelude::*};

use super::error::ApiError;
use super::middleware::CurrentUser;
use super::scope;

#[derive(Serialize)]
pub struct NotificationResponse {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub message: String,
    pub notification_type: String,
    pub is_read: bool,
    pub read_at: Option<chrono::NaiveDateTime>,
    pub link_url: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

impl From<notification::Model> for NotificationResponse {
    fn from(model: notification::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            message: model.message,
            notification_type: model.notification_type,
            is_read: model.is_read,
            read_at: model.read_at,
            link_url: model.link_url,
            created_at: model.created_at,
        }
    }
}

#[derive(Deserialize)]
pub struct NotificationListParams {
    pub is_read: Option<bool>,
    pub notification_type: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateNotificationRequest {
    pub user_id: i32,
    pub title: String,
    pub message: String,
    pub notification_type: String,
    pub link_url: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateNotificationRequest {
    pub title: Option<String>,
    pub message: Option<String>,
    pub notification_type: Option<String>,
    pub link_url: Option<String>,
}

/// Notifications are private to their addressee; everyone else's rows read
/// as missing.
async fn find_scoped(
    db: &DatabaseConnection,
    caller: CurrentUser,
    notification_id: i32,
) -> Result<notification::Model, ApiError> {
    scope::notifications(caller)
        .filter(notification::Column::Id.eq(notification_id))
        .one(db)
        .await?
        .ok_or(ApiError::NotFound("Notification"))
}

/// GET /notifications
pub async fn list_notifications(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Query(params): Query<NotificationListParams>,
) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
    let mut select = scope::notifications(caller);

    if let Some(is_read) = params.is_read {
        select = select.filter(notification::Column::IsRead.eq(is_read));
    }
    if let Some(notification_type) = params.notification_type {
        select = select.filter(notification::Column::NotificationType.eq(notification_type));
    }

    let rows = select
        .order_by_desc(notification::Column::CreatedAt)
        .all(&db)
        .await?;
    Ok(Json(
        rows.into_iter().map(NotificationResponse::from).collect(),
    ))
}

/// GET /notifications/unread
pub async fn unread(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
    let rows = scope::notifications(caller)
        .filter(notification::Column::IsRead.eq(false))
        .order_by_desc(notification::Column::CreatedAt)
        .all(&db)
        .await?;
    Ok(Json(
        rows.into_iter().map(NotificationResponse::from).collect(),
    ))
}

/// GET /notifications/:id
pub async fn get_notification(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(notification_id): Path<i32>,
) -> Result<Json<NotificationResponse>, ApiError> {
    let row = find_scoped(&db, caller, notification_id).await?;
    Ok(Json(row.into()))
}

/// POST /notifications - addressed to any existing user, not just the caller.
pub async fn create_notification(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Json(payload): Json<CreateNotificationRequest>,
) -> Result<Response, ApiError> {
    User::find_by_id(payload.user_id)
        .one(&db)
        .await?
        .ok_or_else(|| ApiError::Validation(format!("User {} does not exist", payload.user_id)))?;

    let row = notification::ActiveModel {
        user_id: Set(payload.user_id),
        title: Set(payload.title),
        message: Set(payload.message),
        notification_type: Set(payload.notification_type),
        is_read: Set(false),
        read_at: Set(None),
        link_url: Set(payload.link_url),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    info!(
        "Notification {} sent to user {} by user {}",
        row.id, row.user_id, caller.id
    );
    Ok((StatusCode::CREATED, Json(NotificationResponse::from(row))).into_response())
}

/// PATCH /notifications/:id - read state only moves through the mark actions.
pub async fn update_notification(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(notification_id): Path<i32>,
    Json(payload): Json<UpdateNotificationRequest>,
) -> Result<Json<NotificationResponse>, ApiError> {
    let row = find_scoped(&db, caller, notification_id).await?;

    let mut active: notification::ActiveModel = row.into();
    if let Some(title) = payload.title {
        active.title = Set(title);
    }
    if let Some(message) = payload.message {
        active.message = Set(message);
    }
    if let Some(notification_type) = payload.notification_type {
        active.notification_type = Set(notification_type);
    }
    if let Some(link_url) = payload.link_url {
        active.link_url = Set(Some(link_url));
    }

    let row = active.update(&db).await?;
    info!("Updated notification {}", row.id);
    Ok(Json(row.into()))
}

/// DELETE /notifications/:id
pub async fn delete_notification(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(notification_id): Path<i32>,
) -> Result<Response, ApiError> {
    let row = find_scoped(&db, caller, notification_id).await?;
    row.delete(&db).await?;

    info!("Deleted notification {}", notification_id);
    Ok((
        StatusCode::OK,
        Json(json!({"message": "Notification deleted"})),
    )
        .into_response())
}

/// POST /notifications/:id/mark-read - idempotent; the read timestamp is only
/// stamped on the first call.
pub async fn mark_read(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(notification_id): Path<i32>,
) -> Result<Json<NotificationResponse>, ApiError> {
    let row = find_scoped(&db, caller, notification_id).await?;
    if row.is_read {
        return Ok(Json(row.into()));
    }

    let mut active: notification::ActiveModel = row.into();
    active.is_read = Set(true);
    active.read_at = Set(Some(chrono::Utc::now().naive_utc()));
    let row = active.update(&db).await?;

    info!("Notification {} marked read", row.id);
    Ok(Json(row.into()))
}

/// POST /notifications/:id/mark-unread - the inverse; clears the timestamp.
pub async fn mark_unread(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(notification_id): Path<i32>,
) -> Result<Json<NotificationResponse>, ApiError> {
    let row = find_scoped(&db, caller, notification_id).await?;
    if !row.is_read {
        return Ok(Json(row.into()));
    }

    let mut active: notification::ActiveModel = row.into();
    active.is_read = Set(false);
    active.read_at = Set(None);
    let row = active.update(&db).await?;

    info!("Notification {} marked unread", row.id);
    Ok(Json(row.into()))
}

/// POST /notifications/mark-all-read - stamps every unread row of the caller,
/// nobody else's.
pub async fn mark_all_read(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<Response, ApiError> {
    let now = chrono::Utc::now().naive_utc();
    let updated = Notification::update_many()
        .col_expr(notification::Column::IsRead, Expr::value(true))
        .col_expr(notification::Column::ReadAt, Expr::value(now))
        .filter(notification::Column::UserId.eq(caller.id))
        .filter(notification::Column::IsRead.eq(false))
        .exec(&db)
        .await?;

    info!(
        "Marked {} notifications read for user {}",
        updated.rows_affected, caller.id
    );
    Ok((
        StatusCode::OK,
        Json(json!({"message": "All notifications marked as read.", "updated": updated.rows_affected})),
    )
        .into_response())
}
