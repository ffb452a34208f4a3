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

use crate::entities::{care_assignment, prelude::*, user};

use super::error::ApiError;
use super::middleware::CurrentUser;

#[derive(Serialize)]
pub struct CareAssignmentResponse {
    pub id: i32,
    pub senior_id: i32,
    pub senior_name: Option<String>,
    pub caretaker_id: i32,
    pub caretaker_name: Option<String>,
    pub start_date: chrono::NaiveDate,
    pub end_date: Option<chrono::NaiveDate>,
    pub is_active: bool,
    pub is_primary_caretaker: bool,
    pub schedule: Option<String>,
    pub notes: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl CareAssignmentResponse {
    fn from_parts(
        model: care_assignment::Model,
        names: &std::collections::HashMap<i32, String>,
    ) -> Self {
        Self {
            id: model.id,
            senior_name: names.get(&model.senior_id).cloned(),
            senior_id: model.senior_id,
            caretaker_name: names.get(&model.caretaker_id).cloned(),
            caretaker_id: model.caretaker_id,
            start_date: model.start_date,
            end_date: model.end_date,
            is_active: model.is_active,
            is_primary_caretaker: model.is_primary_caretaker,
            schedule: model.schedule,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Deserialize)]
pub struct AssignmentListParams {
    pub senior: Option<i32>,
    pub caretaker: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
pub struct CreateAssignmentRequest {
    pub senior_id: i32,
    pub caretaker_id: i32,
    pub start_date: chrono::NaiveDate,
    pub end_date: Option<chrono::NaiveDate>,
    pub is_primary_caretaker: Option<bool>,
    pub schedule: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateAssignmentRequest {
    pub end_date: Option<chrono::NaiveDate>,
    pub is_active: Option<bool>,
    pub is_primary_caretaker: Option<bool>,
    pub schedule: Option<String>,
    pub notes: Option<String>,
}

async fn names_for(
    db: &DatabaseConnection,
    rows: &[care_assignment::Model],
) -> Result<std::collections::HashMap<i32, String>, ApiError> {
    let ids = rows
        .iter()
        .flat_map(|a| [a.senior_id, a.caretaker_id]);
    Ok(super::user_name_map(db, ids).await?)
}

/// GET /care-assignments
pub async fn list_assignments(
    Extension(db): Extension<DatabaseConnection>,
    Extension(_caller): Extension<CurrentUser>,
    Query(params): Query<AssignmentListParams>,
) -> Result<Json<Vec<CareAssignmentResponse>>, ApiError> {
    let mut select = CareAssignment::find();

    if let Some(senior) = params.senior {
        select = select.filter(care_assignment::Column::SeniorId.eq(senior));
    }
    if let Some(caretaker) = params.caretaker {
        select = select.filter(care_assignment::Column::CaretakerId.eq(caretaker));
    }
    if let Some(is_active) = params.is_active {
        select = select.filter(care_assignment::Column::IsActive.eq(is_active));
    }

    let rows = select
        .order_by_desc(care_assignment::Column::CreatedAt)
        .all(&db)
        .await?;
    let names = names_for(&db, &rows).await?;
    Ok(Json(
        rows.into_iter()
            .map(|a| CareAssignmentResponse::from_parts(a, &names))
            .collect(),
    ))
}

/// GET /care-assignments/:id
pub async fn get_assignment(
    Extension(db): Extension<DatabaseConnection>,
    Path(assignment_id): Path<i32>,
) -> Result<Json<CareAssignmentResponse>, ApiError> {
    let assignment = CareAssignment::find_by_id(assignment_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Care assignment"))?;
    let names = names_for(&db, std::slice::from_ref(&assignment)).await?;
    Ok(Json(CareAssignmentResponse::from_parts(assignment, &names)))
}

/// POST /care-assignments
pub async fn create_assignment(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Json(payload): Json<CreateAssignmentRequest>,
) -> Result<Response, ApiError> {
    super::expect_role(&db, payload.senior_id, user::Role::Senior).await?;
    super::expect_role(&db, payload.caretaker_id, user::Role::Caretaker).await?;

    let now = chrono::Utc::now().naive_utc();
    let assignment = care_assignment::ActiveModel {
        senior_id: Set(payload.senior_id),
        caretaker_id: Set(payload.caretaker_id),
        start_date: Set(payload.start_date),
        end_date: Set(payload.end_date),
        is_active: Set(true),
        is_primary_caretaker: Set(payload.is_primary_caretaker.unwrap_or(false)),
        schedule: Set(payload.schedule),
        notes: Set(payload.notes),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    info!(
        "Care assignment {} links senior {} to caretaker {} (by user {})",
        assignment.id, assignment.senior_id, assignment.caretaker_id, caller.id
    );
    let names = names_for(&db, std::slice::from_ref(&assignment)).await?;
    Ok((
        StatusCode::CREATED,
        Json(CareAssignmentResponse::from_parts(assignment, &names)),
    )
        .into_response())
}

/// PATCH /care-assignments/:id - the senior/caretaker pair is immutable;
/// end an assignment and create a new one to change hands.
pub async fn update_assignment(
    Extension(db): Extension<DatabaseConnection>,
    Path(assignment_id): Path<i32>,
    Json(payload): Json<UpdateAssignmentRequest>,
) -> Result<Json<CareAssignmentResponse>, ApiError> {
    let assignment = CareAssignment::find_by_id(assignment_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Care assignment"))?;

    let mut active: care_assignment::ActiveModel = assignment.into();
    if let Some(end_date) = payload.end_date {
        active.end_date = Set(Some(end_date));
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(is_primary) = payload.is_primary_caretaker {
        active.is_primary_caretaker = Set(is_primary);
    }
    if let Some(schedule) = payload.schedule {
        active.schedule = Set(Some(schedule));
    }
    if let Some(notes) = payload.notes {
        active.notes = Set(Some(notes));
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());

    let assignment = active.update(&db).await?;
    let names = names_for(&db, std::slice::from_ref(&assignment)).await?;

    info!("Updated care assignment {}", assignment.id);
    Ok(Json(CareAssignmentResponse::from_parts(assignment, &names)))
}

/// DELETE /care-assignments/:id
pub async fn delete_assignment(
    Extension(db): Extension<DatabaseConnection>,
    Path(assignment_id): Path<i32>,
) -> Result<Response, ApiError> {
    let assignment = CareAssignment::find_by_id(assignment_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Care assignment"))?;
    assignment.delete(&db).await?;

    info!("Deleted care assignment {}", assignment_id);
    Ok((
        StatusCode::OK,
        Json(json!({"message": "Care assignment deleted"})),
    )
        .into_response())
}
