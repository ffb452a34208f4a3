use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::entities::{event, event_registration, prelude::*};

use super::error::ApiError;
use super::middleware::CurrentUser;

#[derive(Serialize)]
pub struct EventResponse {
    pub id: i32,
    pub ngo_id: i32,
    pub ngo_name: Option<String>,
    pub title: String,
    pub description: String,
    pub event_type: String,
    pub event_date: chrono::NaiveDate,
    pub start_time: chrono::NaiveTime,
    pub end_time: chrono::NaiveTime,
    pub venue: String,
    pub address: String,
    pub max_participants: i32,
    pub current_registrations: i32,
    pub spaces_available: i32,
    pub is_active: bool,
    pub registration_deadline: Option<chrono::NaiveDate>,
    pub notes: Option<String>,
    pub created_by: Option<i32>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl EventResponse {
    fn from_parts(model: event::Model, ngo_names: &std::collections::HashMap<i32, String>) -> Self {
        Self {
            id: model.id,
            ngo_name: ngo_names.get(&model.ngo_id).cloned(),
            ngo_id: model.ngo_id,
            title: model.title,
            description: model.description,
            event_type: model.event_type,
            event_date: model.event_date,
            start_time: model.start_time,
            end_time: model.end_time,
            venue: model.venue,
            address: model.address,
            spaces_available: (model.max_participants - model.current_registrations).max(0),
            max_participants: model.max_participants,
            current_registrations: model.current_registrations,
            is_active: model.is_active,
            registration_deadline: model.registration_deadline,
            notes: model.notes,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct RegistrationResponse {
    pub id: i32,
    pub event_id: i32,
    pub event_title: Option<String>,
    pub user_id: i32,
    pub user_name: Option<String>,
    pub registration_date: chrono::NaiveDateTime,
    pub attended: bool,
    pub check_in_time: Option<chrono::NaiveDateTime>,
    pub notes: Option<String>,
}

impl RegistrationResponse {
    fn from_parts(
        model: event_registration::Model,
        event_title: Option<String>,
        user_name: Option<String>,
    ) -> Self {
        Self {
            id: model.id,
            event_id: model.event_id,
            event_title,
            user_id: model.user_id,
            user_name,
            registration_date: model.registration_date,
            attended: model.attended,
            check_in_time: model.check_in_time,
            notes: model.notes,
        }
    }
}

#[derive(Deserialize)]
pub struct EventListParams {
    pub ngo: Option<i32>,
    pub event_type: Option<String>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub ngo_id: i32,
    pub title: String,
    pub description: String,
    pub event_type: String,
    pub event_date: chrono::NaiveDate,
    pub start_time: chrono::NaiveTime,
    pub end_time: chrono::NaiveTime,
    pub venue: String,
    pub address: String,
    pub max_participants: Option<i32>,
    pub registration_deadline: Option<chrono::NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_type: Option<String>,
    pub event_date: Option<chrono::NaiveDate>,
    pub start_time: Option<chrono::NaiveTime>,
    pub end_time: Option<chrono::NaiveTime>,
    pub venue: Option<String>,
    pub address: Option<String>,
    pub max_participants: Option<i32>,
    pub is_active: Option<bool>,
    pub registration_deadline: Option<chrono::NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub notes: Option<String>,
}

async fn find_event(db: &DatabaseConnection, event_id: i32) -> Result<event::Model, ApiError> {
    Event::find_by_id(event_id)
        .one(db)
        .await?
        .ok_or(ApiError::NotFound("Event"))
}

/// GET /events
pub async fn list_events(
    Extension(db): Extension<DatabaseConnection>,
    Extension(_caller): Extension<CurrentUser>,
    Query(params): Query<EventListParams>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let mut select = Event::find();

    if let Some(ngo) = params.ngo {
        select = select.filter(event::Column::NgoId.eq(ngo));
    }
    if let Some(event_type) = params.event_type {
        select = select.filter(event::Column::EventType.eq(event_type));
    }
    if let Some(is_active) = params.is_active {
        select = select.filter(event::Column::IsActive.eq(is_active));
    }
    if let Some(search) = params.search {
        select = select.filter(
            Condition::any()
                .add(event::Column::Title.contains(&search))
                .add(event::Column::Description.contains(&search))
                .add(event::Column::Venue.contains(&search)),
        );
    }

    let rows = select
        .order_by_asc(event::Column::EventDate)
        .order_by_asc(event::Column::StartTime)
        .all(&db)
        .await?;
    let ngo_names = super::ngo_name_map(&db, rows.iter().map(|e| e.ngo_id)).await?;
    Ok(Json(
        rows.into_iter()
            .map(|e| EventResponse::from_parts(e, &ngo_names))
            .collect(),
    ))
}

/// GET /events/upcoming - active events from today onward.
pub async fn upcoming(
    Extension(db): Extension<DatabaseConnection>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let today = chrono::Utc::now().naive_utc().date();
    let rows = Event::find()
        .filter(event::Column::EventDate.gte(today))
        .filter(event::Column::IsActive.eq(true))
        .order_by_asc(event::Column::EventDate)
        .order_by_asc(event::Column::StartTime)
        .all(&db)
        .await?;
    let ngo_names = super::ngo_name_map(&db, rows.iter().map(|e| e.ngo_id)).await?;
    Ok(Json(
        rows.into_iter()
            .map(|e| EventResponse::from_parts(e, &ngo_names))
            .collect(),
    ))
}

/// GET /events/:id
pub async fn get_event(
    Extension(db): Extension<DatabaseConnection>,
    Path(event_id): Path<i32>,
) -> Result<Json<EventResponse>, ApiError> {
    let row = find_event(&db, event_id).await?;
    let ngo_names = super::ngo_name_map(&db, [row.ngo_id]).await?;
    Ok(Json(EventResponse::from_parts(row, &ngo_names)))
}

/// POST /events
pub async fn create_event(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<Response, ApiError> {
    let ngo = Ngo::find_by_id(payload.ngo_id)
        .one(&db)
        .await?
        .ok_or_else(|| ApiError::Validation(format!("NGO {} does not exist", payload.ngo_id)))?;

    let now = chrono::Utc::now().naive_utc();
    let row = event::ActiveModel {
        ngo_id: Set(payload.ngo_id),
        title: Set(payload.title),
        description: Set(payload.description),
        event_type: Set(payload.event_type),
        event_date: Set(payload.event_date),
        start_time: Set(payload.start_time),
        end_time: Set(payload.end_time),
        venue: Set(payload.venue),
        address: Set(payload.address),
        max_participants: Set(payload.max_participants.unwrap_or(50)),
        current_registrations: Set(0),
        is_active: Set(true),
        registration_deadline: Set(payload.registration_deadline),
        notes: Set(payload.notes),
        created_by: Set(Some(caller.id)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    info!(
        "Event {} created for NGO {} by user {}",
        row.id, row.ngo_id, caller.id
    );
    metrics::gauge!("seniorcare_events_total").increment(1.0);
    let ngo_names = std::collections::HashMap::from([(ngo.id, ngo.name)]);
    Ok((
        StatusCode::CREATED,
        Json(EventResponse::from_parts(row, &ngo_names)),
    )
        .into_response())
}

/// PATCH /events/:id - the registration counter only moves through register.
pub async fn update_event(
    Extension(db): Extension<DatabaseConnection>,
    Path(event_id): Path<i32>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<Json<EventResponse>, ApiError> {
    let row = find_event(&db, event_id).await?;

    let mut active: event::ActiveModel = row.into();
    if let Some(title) = payload.title {
        active.title = Set(title);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(event_type) = payload.event_type {
        active.event_type = Set(event_type);
    }
    if let Some(event_date) = payload.event_date {
        active.event_date = Set(event_date);
    }
    if let Some(start_time) = payload.start_time {
        active.start_time = Set(start_time);
    }
    if let Some(end_time) = payload.end_time {
        active.end_time = Set(end_time);
    }
    if let Some(venue) = payload.venue {
        active.venue = Set(venue);
    }
    if let Some(address) = payload.address {
        active.address = Set(address);
    }
    if let Some(max_participants) = payload.max_participants {
        active.max_participants = Set(max_participants);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(deadline) = payload.registration_deadline {
        active.registration_deadline = Set(Some(deadline));
    }
    if let Some(notes) = payload.notes {
        active.notes = Set(Some(notes));
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());

    let row = active.update(&db).await?;
    let ngo_names = super::ngo_name_map(&db, [row.ngo_id]).await?;

    info!("Updated event {}", row.id);
    Ok(Json(EventResponse::from_parts(row, &ngo_names)))
}

/// DELETE /events/:id
pub async fn delete_event(
    Extension(db): Extension<DatabaseConnection>,
    Path(event_id): Path<i32>,
) -> Result<Response, ApiError> {
    let row = find_event(&db, event_id).await?;
    row.delete(&db).await?;

    info!("Deleted event {}", event_id);
    metrics::gauge!("seniorcare_events_total").decrement(1.0);
    Ok((StatusCode::OK, Json(json!({"message": "Event deleted"}))).into_response())
}

/// POST /events/:id/register - registers the caller. The counter moves via a
/// conditional increment inside the transaction, so capacity holds under
/// concurrent registrations; the unique (event, user) index backstops the
/// duplicate pre-check.
pub async fn register(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(event_id): Path<i32>,
    body: Option<Json<RegisterRequest>>,
) -> Result<Response, ApiError> {
    let row = find_event(&db, event_id).await?;

    let already = EventRegistration::find()
        .filter(event_registration::Column::EventId.eq(event_id))
        .filter(event_registration::Column::UserId.eq(caller.id))
        .one(&db)
        .await?;
    if already.is_some() {
        return Err(ApiError::Conflict(
            "Already registered for this event".into(),
        ));
    }

    let now = chrono::Utc::now().naive_utc();
    let txn = db.begin().await?;

    let claimed = Event::update_many()
        .col_expr(
            event::Column::CurrentRegistrations,
            Expr::col(event::Column::CurrentRegistrations).add(1),
        )
        .col_expr(event::Column::UpdatedAt, Expr::value(now))
        .filter(event::Column::Id.eq(event_id))
        .filter(event::Column::CurrentRegistrations.lt(row.max_participants))
        .exec(&txn)
        .await?;
    if claimed.rows_affected == 0 {
        return Err(ApiError::CapacityExceeded("Event is full".into()));
    }

    let registration = event_registration::ActiveModel {
        event_id: Set(event_id),
        user_id: Set(caller.id),
        registration_date: Set(now),
        attended: Set(false),
        check_in_time: Set(None),
        notes: Set(body.and_then(|Json(b)| b.notes)),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            ApiError::Conflict("Already registered for this event".into())
        }
        _ => ApiError::Database(e),
    })?;

    txn.commit().await?;

    tracing::Span::current()
        .record("table", "event_registrations")
        .record("action", "register_for_event")
        .record("user_id", caller.id)
        .record("business_event", "event registration");
    metrics::counter!("seniorcare_event_registrations_total").increment(1);

    info!("User {} registered for event {}", caller.id, event_id);
    let user_names = super::user_name_map(&db, [caller.id]).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegistrationResponse::from_parts(
            registration,
            Some(row.title),
            user_names.get(&caller.id).cloned(),
        )),
    )
        .into_response())
}

/// GET /events/:id/registrations
pub async fn list_registrations(
    Extension(db): Extension<DatabaseConnection>,
    Path(event_id): Path<i32>,
) -> Result<Json<Vec<RegistrationResponse>>, ApiError> {
    let row = find_event(&db, event_id).await?;
    let registrations = EventRegistration::find()
        .filter(event_registration::Column::EventId.eq(event_id))
        .order_by_desc(event_registration::Column::RegistrationDate)
        .all(&db)
        .await?;
    let user_names =
        super::user_name_map(&db, registrations.iter().map(|r| r.user_id)).await?;
    Ok(Json(
        registrations
            .into_iter()
            .map(|r| {
                let user_name = user_names.get(&r.user_id).cloned();
                RegistrationResponse::from_parts(r, Some(row.title.clone()), user_name)
            })
            .collect(),
    ))
}
