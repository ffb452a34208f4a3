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

use crate::entities::{emergency_alert, prelude::*, user};

use super::error::ApiError;
use super::middleware::CurrentUser;

#[derive(Serialize)]
pub struct AlertResponse {
    pub id: i32,
    pub senior_id: i32,
    pub senior_name: Option<String>,
    pub alert_time: chrono::NaiveDateTime,
    pub alert_type: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_resolved: bool,
    pub resolved_at: Option<chrono::NaiveDateTime>,
    pub resolved_by: Option<i32>,
    pub resolved_by_name: Option<String>,
    pub response_time_seconds: Option<i64>,
    pub responders_notified: Option<String>,
    pub notes: Option<String>,
    pub resolution_notes: Option<String>,
}

impl AlertResponse {
    fn from_parts(
        model: emergency_alert::Model,
        names: &std::collections::HashMap<i32, String>,
    ) -> Self {
        Self {
            id: model.id,
            senior_name: names.get(&model.senior_id).cloned(),
            senior_id: model.senior_id,
            alert_time: model.alert_time,
            alert_type: model.alert_type,
            location: model.location,
            latitude: model.latitude,
            longitude: model.longitude,
            is_resolved: model.is_resolved,
            resolved_at: model.resolved_at,
            resolved_by_name: model.resolved_by.and_then(|id| names.get(&id).cloned()),
            resolved_by: model.resolved_by,
            response_time_seconds: model.response_time_seconds,
            responders_notified: model.responders_notified,
            notes: model.notes,
            resolution_notes: model.resolution_notes,
        }
    }
}

#[derive(Deserialize)]
pub struct AlertListParams {
    pub is_resolved: Option<bool>,
    pub alert_type: Option<String>,
    pub senior: Option<i32>,
}

#[derive(Deserialize)]
pub struct CreateAlertRequest {
    pub senior_id: i32,
    pub alert_type: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub responders_notified: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateAlertRequest {
    pub alert_type: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub responders_notified: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct ResolveAlertRequest {
    pub notes: Option<String>,
}

async fn names_for(
    db: &DatabaseConnection,
    rows: &[emergency_alert::Model],
) -> Result<std::collections::HashMap<i32, String>, ApiError> {
    let ids = rows
        .iter()
        .flat_map(|a| std::iter::once(a.senior_id).chain(a.resolved_by));
    Ok(super::user_name_map(db, ids).await?)
}

async fn find_alert(
    db: &DatabaseConnection,
    alert_id: i32,
) -> Result<emergency_alert::Model, ApiError> {
    EmergencyAlert::find_by_id(alert_id)
        .one(db)
        .await?
        .ok_or(ApiError::NotFound("Emergency alert"))
}

/// GET /emergency-alerts - alerts are visible to every authenticated role so
/// anyone nearby can respond.
pub async fn list_alerts(
    Extension(db): Extension<DatabaseConnection>,
    Extension(_caller): Extension<CurrentUser>,
    Query(params): Query<AlertListParams>,
) -> Result<Json<Vec<AlertResponse>>, ApiError> {
    let mut select = EmergencyAlert::find();

    if let Some(is_resolved) = params.is_resolved {
        select = select.filter(emergency_alert::Column::IsResolved.eq(is_resolved));
    }
    if let Some(alert_type) = params.alert_type {
        select = select.filter(emergency_alert::Column::AlertType.eq(alert_type));
    }
    if let Some(senior) = params.senior {
        select = select.filter(emergency_alert::Column::SeniorId.eq(senior));
    }

    let rows = select
        .order_by_desc(emergency_alert::Column::AlertTime)
        .all(&db)
        .await?;
    let names = names_for(&db, &rows).await?;
    Ok(Json(
        rows.into_iter()
            .map(|a| AlertResponse::from_parts(a, &names))
            .collect(),
    ))
}

/// GET /emergency-alerts/active - unresolved alerts, newest first.
pub async fn active(
    Extension(db): Extension<DatabaseConnection>,
) -> Result<Json<Vec<AlertResponse>>, ApiError> {
    let rows = EmergencyAlert::find()
        .filter(emergency_alert::Column::IsResolved.eq(false))
        .order_by_desc(emergency_alert::Column::AlertTime)
        .all(&db)
        .await?;
    let names = names_for(&db, &rows).await?;
    Ok(Json(
        rows.into_iter()
            .map(|a| AlertResponse::from_parts(a, &names))
            .collect(),
    ))
}

/// GET /emergency-alerts/:id
pub async fn get_alert(
    Extension(db): Extension<DatabaseConnection>,
    Path(alert_id): Path<i32>,
) -> Result<Json<AlertResponse>, ApiError> {
    let alert = find_alert(&db, alert_id).await?;
    let names = names_for(&db, std::slice::from_ref(&alert)).await?;
    Ok(Json(AlertResponse::from_parts(alert, &names)))
}

/// POST /emergency-alerts
pub async fn create_alert(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Json(payload): Json<CreateAlertRequest>,
) -> Result<Response, ApiError> {
    let senior = super::expect_role(&db, payload.senior_id, user::Role::Senior).await?;

    let alert = emergency_alert::ActiveModel {
        senior_id: Set(payload.senior_id),
        alert_time: Set(chrono::Utc::now().naive_utc()),
        alert_type: Set(payload.alert_type),
        location: Set(payload.location),
        latitude: Set(payload.latitude),
        longitude: Set(payload.longitude),
        is_resolved: Set(false),
        resolved_at: Set(None),
        resolved_by: Set(None),
        response_time_seconds: Set(None),
        responders_notified: Set(payload.responders_notified),
        notes: Set(payload.notes),
        resolution_notes: Set(None),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    tracing::Span::current()
        .record("table", "emergency_alerts")
        .record("action", "raise_alert")
        .record("user_id", caller.id)
        .record("business_event", "emergency alert raised");
    metrics::counter!("seniorcare_alerts_raised_total").increment(1);
    metrics::gauge!("seniorcare_active_alerts").increment(1.0);

    info!(
        "Emergency alert {} ({}) raised for senior {} by user {}",
        alert.id, alert.alert_type, alert.senior_id, caller.id
    );
    let names = std::collections::HashMap::from([(senior.id, senior.full_name())]);
    Ok((
        StatusCode::CREATED,
        Json(AlertResponse::from_parts(alert, &names)),
    )
        .into_response())
}

/// PATCH /emergency-alerts/:id - resolution state only moves through resolve.
pub async fn update_alert(
    Extension(db): Extension<DatabaseConnection>,
    Path(alert_id): Path<i32>,
    Json(payload): Json<UpdateAlertRequest>,
) -> Result<Json<AlertResponse>, ApiError> {
    let alert = find_alert(&db, alert_id).await?;

    let mut active: emergency_alert::ActiveModel = alert.into();
    if let Some(alert_type) = payload.alert_type {
        active.alert_type = Set(alert_type);
    }
    if let Some(location) = payload.location {
        active.location = Set(Some(location));
    }
    if let Some(latitude) = payload.latitude {
        active.latitude = Set(Some(latitude));
    }
    if let Some(longitude) = payload.longitude {
        active.longitude = Set(Some(longitude));
    }
    if let Some(responders_notified) = payload.responders_notified {
        active.responders_notified = Set(Some(responders_notified));
    }
    if let Some(notes) = payload.notes {
        active.notes = Set(Some(notes));
    }

    let alert = active.update(&db).await?;
    let names = names_for(&db, std::slice::from_ref(&alert)).await?;

    info!("Updated emergency alert {}", alert.id);
    Ok(Json(AlertResponse::from_parts(alert, &names)))
}

/// DELETE /emergency-alerts/:id
pub async fn delete_alert(
    Extension(db): Extension<DatabaseConnection>,
    Path(alert_id): Path<i32>,
) -> Result<Response, ApiError> {
    let alert = find_alert(&db, alert_id).await?;
    if !alert.is_resolved {
        metrics::gauge!("seniorcare_active_alerts").decrement(1.0);
    }
    alert.delete(&db).await?;

    info!("Deleted emergency alert {}", alert_id);
    Ok((
        StatusCode::OK,
        Json(json!({"message": "Emergency alert deleted"})),
    )
        .into_response())
}

/// POST /emergency-alerts/:id/resolve - stamps who resolved it and when, and
/// derives the response time from the original alert time.
pub async fn resolve(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(alert_id): Path<i32>,
    body: Option<Json<ResolveAlertRequest>>,
) -> Result<Json<AlertResponse>, ApiError> {
    let alert = find_alert(&db, alert_id).await?;
    if alert.is_resolved {
        return Err(ApiError::Conflict(
            "Emergency alert is already resolved".into(),
        ));
    }

    let now = chrono::Utc::now().naive_utc();
    let response_seconds = (now - alert.alert_time).num_seconds();

    let mut active: emergency_alert::ActiveModel = alert.into();
    active.is_resolved = Set(true);
    active.resolved_at = Set(Some(now));
    active.resolved_by = Set(Some(caller.id));
    active.response_time_seconds = Set(Some(response_seconds));
    active.resolution_notes = Set(body.and_then(|Json(b)| b.notes));
    let alert = active.update(&db).await?;

    tracing::Span::current()
        .record("table", "emergency_alerts")
        .record("action", "resolve_alert")
        .record("user_id", caller.id)
        .record("business_event", "emergency alert resolved");
    metrics::counter!("seniorcare_alerts_resolved_total").increment(1);
    metrics::gauge!("seniorcare_active_alerts").decrement(1.0);
    metrics::histogram!("seniorcare_alert_response_time_seconds")
        .record(response_seconds as f64);

    info!(
        "Emergency alert {} resolved by user {} after {}s",
        alert.id, caller.id, response_seconds
    );
    let names = names_for(&db, std::slice::from_ref(&alert)).await?;
    Ok(Json(AlertResponse::from_parts(alert, &names)))
}
