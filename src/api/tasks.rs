use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::entities::volunteer_task::{self, TaskStatus};
use crate::entities::{prelude::*, user, volunteer_profile};

use super::error::ApiError;
use super::middleware::CurrentUser;
use super::scope;

#[derive(Serialize)]
pub struct TaskResponse {
    pub id: i32,
    pub senior_id: i32,
    pub senior_name: Option<String>,
    pub volunteer_id: i32,
    pub volunteer_name: Option<String>,
    pub ngo_id: i32,
    pub ngo_name: Option<String>,
    pub title: String,
    pub task_type: String,
    pub description: String,
    pub scheduled_date: chrono::NaiveDate,
    pub scheduled_time: chrono::NaiveTime,
    pub estimated_duration: i32,
    pub location: String,
    pub status: TaskStatus,
    pub actual_start_time: Option<chrono::NaiveDateTime>,
    pub actual_end_time: Option<chrono::NaiveDateTime>,
    pub completion_notes: Option<String>,
    pub hours_logged: f64,
    pub notes: Option<String>,
    pub created_by: Option<i32>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl TaskResponse {
    fn from_parts(
        model: volunteer_task::Model,
        user_names: &std::collections::HashMap<i32, String>,
        ngo_names: &std::collections::HashMap<i32, String>,
    ) -> Self {
        Self {
            id: model.id,
            senior_name: user_names.get(&model.senior_id).cloned(),
            senior_id: model.senior_id,
            volunteer_name: user_names.get(&model.volunteer_id).cloned(),
            volunteer_id: model.volunteer_id,
            ngo_name: ngo_names.get(&model.ngo_id).cloned(),
            ngo_id: model.ngo_id,
            title: model.title,
            task_type: model.task_type,
            description: model.description,
            scheduled_date: model.scheduled_date,
            scheduled_time: model.scheduled_time,
            estimated_duration: model.estimated_duration,
            location: model.location,
            status: model.status,
            actual_start_time: model.actual_start_time,
            actual_end_time: model.actual_end_time,
            completion_notes: model.completion_notes,
            hours_logged: model.hours_logged,
            notes: model.notes,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Deserialize)]
pub struct TaskListParams {
    pub status: Option<String>,
    pub task_type: Option<String>,
    pub volunteer: Option<i32>,
    pub ngo: Option<i32>,
    pub search: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateTaskRequest {
    pub senior_id: i32,
    pub volunteer_id: i32,
    pub ngo_id: i32,
    pub title: String,
    pub task_type: String,
    pub description: String,
    pub scheduled_date: chrono::NaiveDate,
    pub scheduled_time: chrono::NaiveTime,
    pub estimated_duration: Option<i32>,
    pub location: String,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub task_type: Option<String>,
    pub description: Option<String>,
    pub scheduled_date: Option<chrono::NaiveDate>,
    pub scheduled_time: Option<chrono::NaiveTime>,
    pub estimated_duration: Option<i32>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct CompleteTaskRequest {
    pub notes: Option<String>,
}

async fn names_for(
    db: &DatabaseConnection,
    rows: &[volunteer_task::Model],
) -> Result<
    (
        std::collections::HashMap<i32, String>,
        std::collections::HashMap<i32, String>,
    ),
    ApiError,
> {
    let user_ids = rows.iter().flat_map(|t| [t.senior_id, t.volunteer_id]);
    let user_names = super::user_name_map(db, user_ids).await?;
    let ngo_names = super::ngo_name_map(db, rows.iter().map(|t| t.ngo_id)).await?;
    Ok((user_names, ngo_names))
}

async fn find_scoped(
    db: &DatabaseConnection,
    caller: CurrentUser,
    task_id: i32,
) -> Result<volunteer_task::Model, ApiError> {
    scope::tasks(caller)
        .filter(volunteer_task::Column::Id.eq(task_id))
        .one(db)
        .await?
        .ok_or(ApiError::NotFound("Task"))
}

/// Transitions are for the assigned volunteer or an admin.
fn check_actor(caller: CurrentUser, task: &volunteer_task::Model) -> Result<(), ApiError> {
    if caller.id == task.volunteer_id || caller.role.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Only the assigned volunteer can move this task".into(),
        ))
    }
}

fn bad_transition(task: &volunteer_task::Model, target: TaskStatus) -> ApiError {
    ApiError::Conflict(format!(
        "Task is {} and cannot move to {}",
        task.status.to_value(),
        target.to_value()
    ))
}

/// GET /tasks
pub async fn list_tasks(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Query(params): Query<TaskListParams>,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    let mut select = scope::tasks(caller);

    if let Some(status) = params.status {
        let status = TaskStatus::try_from_value(&status)
            .map_err(|_| ApiError::Validation(format!("Unknown status: {}", status)))?;
        select = select.filter(volunteer_task::Column::Status.eq(status));
    }
    if let Some(task_type) = params.task_type {
        select = select.filter(volunteer_task::Column::TaskType.eq(task_type));
    }
    if let Some(volunteer) = params.volunteer {
        select = select.filter(volunteer_task::Column::VolunteerId.eq(volunteer));
    }
    if let Some(ngo) = params.ngo {
        select = select.filter(volunteer_task::Column::NgoId.eq(ngo));
    }
    if let Some(search) = params.search {
        select = select.filter(
            Condition::any()
                .add(volunteer_task::Column::Title.contains(&search))
                .add(volunteer_task::Column::Description.contains(&search)),
        );
    }

    let rows = select
        .order_by_asc(volunteer_task::Column::ScheduledDate)
        .order_by_asc(volunteer_task::Column::ScheduledTime)
        .all(&db)
        .await?;
    let (user_names, ngo_names) = names_for(&db, &rows).await?;
    Ok(Json(
        rows.into_iter()
            .map(|t| TaskResponse::from_parts(t, &user_names, &ngo_names))
            .collect(),
    ))
}

/// GET /tasks/my-tasks - the caller's open tasks.
pub async fn my_tasks(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    let rows = scope::tasks(caller)
        .filter(volunteer_task::Column::Status.is_in([
            TaskStatus::Assigned,
            TaskStatus::Accepted,
            TaskStatus::InProgress,
        ]))
        .order_by_asc(volunteer_task::Column::ScheduledDate)
        .order_by_asc(volunteer_task::Column::ScheduledTime)
        .all(&db)
        .await?;
    let (user_names, ngo_names) = names_for(&db, &rows).await?;
    Ok(Json(
        rows.into_iter()
            .map(|t| TaskResponse::from_parts(t, &user_names, &ngo_names))
            .collect(),
    ))
}

/// GET /tasks/:id
pub async fn get_task(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(task_id): Path<i32>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = find_scoped(&db, caller, task_id).await?;
    let (user_names, ngo_names) = names_for(&db, std::slice::from_ref(&task)).await?;
    Ok(Json(TaskResponse::from_parts(task, &user_names, &ngo_names)))
}

/// POST /tasks
pub async fn create_task(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<Response, ApiError> {
    super::expect_role(&db, payload.senior_id, user::Role::Senior).await?;
    super::expect_role(&db, payload.volunteer_id, user::Role::Volunteer).await?;
    Ngo::find_by_id(payload.ngo_id)
        .one(&db)
        .await?
        .ok_or_else(|| ApiError::Validation(format!("NGO {} does not exist", payload.ngo_id)))?;

    let now = chrono::Utc::now().naive_utc();
    let task = volunteer_task::ActiveModel {
        senior_id: Set(payload.senior_id),
        volunteer_id: Set(payload.volunteer_id),
        ngo_id: Set(payload.ngo_id),
        title: Set(payload.title),
        task_type: Set(payload.task_type),
        description: Set(payload.description),
        scheduled_date: Set(payload.scheduled_date),
        scheduled_time: Set(payload.scheduled_time),
        estimated_duration: Set(payload.estimated_duration.unwrap_or(60)),
        location: Set(payload.location),
        status: Set(TaskStatus::Assigned),
        actual_start_time: Set(None),
        actual_end_time: Set(None),
        completion_notes: Set(None),
        hours_logged: Set(0.0),
        notes: Set(payload.notes),
        created_by: Set(Some(caller.id)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    info!(
        "Task {} assigned to volunteer {} for senior {} by user {}",
        task.id, task.volunteer_id, task.senior_id, caller.id
    );
    let (user_names, ngo_names) = names_for(&db, std::slice::from_ref(&task)).await?;
    Ok((
        StatusCode::CREATED,
        Json(TaskResponse::from_parts(task, &user_names, &ngo_names)),
    )
        .into_response())
}

/// PATCH /tasks/:id - timing stamps, hours, and completion notes only move
/// through the transition actions.
pub async fn update_task(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(task_id): Path<i32>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = find_scoped(&db, caller, task_id).await?;

    let mut active: volunteer_task::ActiveModel = task.into();
    if let Some(title) = payload.title {
        active.title = Set(title);
    }
    if let Some(task_type) = payload.task_type {
        active.task_type = Set(task_type);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(scheduled_date) = payload.scheduled_date {
        active.scheduled_date = Set(scheduled_date);
    }
    if let Some(scheduled_time) = payload.scheduled_time {
        active.scheduled_time = Set(scheduled_time);
    }
    if let Some(estimated_duration) = payload.estimated_duration {
        active.estimated_duration = Set(estimated_duration);
    }
    if let Some(location) = payload.location {
        active.location = Set(location);
    }
    if let Some(status) = payload.status {
        let status = TaskStatus::try_from_value(&status)
            .map_err(|_| ApiError::Validation(format!("Unknown status: {}", status)))?;
        active.status = Set(status);
    }
    if let Some(notes) = payload.notes {
        active.notes = Set(Some(notes));
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());

    let task = active.update(&db).await?;
    let (user_names, ngo_names) = names_for(&db, std::slice::from_ref(&task)).await?;

    info!("Updated task {}", task.id);
    Ok(Json(TaskResponse::from_parts(task, &user_names, &ngo_names)))
}

/// DELETE /tasks/:id
pub async fn delete_task(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(task_id): Path<i32>,
) -> Result<Response, ApiError> {
    let task = find_scoped(&db, caller, task_id).await?;
    task.delete(&db).await?;

    info!("Deleted task {}", task_id);
    Ok((StatusCode::OK, Json(json!({"message": "Task deleted"}))).into_response())
}

/// POST /tasks/:id/accept
pub async fn accept(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(task_id): Path<i32>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = find_scoped(&db, caller, task_id).await?;
    check_actor(caller, &task)?;
    if task.status != TaskStatus::Assigned {
        return Err(bad_transition(&task, TaskStatus::Accepted));
    }

    let mut active: volunteer_task::ActiveModel = task.into();
    active.status = Set(TaskStatus::Accepted);
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    let task = active.update(&db).await?;

    info!("Task {} accepted by volunteer {}", task.id, caller.id);
    let (user_names, ngo_names) = names_for(&db, std::slice::from_ref(&task)).await?;
    Ok(Json(TaskResponse::from_parts(task, &user_names, &ngo_names)))
}

/// POST /tasks/:id/start - stamps the actual start time.
pub async fn start(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(task_id): Path<i32>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = find_scoped(&db, caller, task_id).await?;
    check_actor(caller, &task)?;
    if task.status != TaskStatus::Accepted {
        return Err(bad_transition(&task, TaskStatus::InProgress));
    }

    let now = chrono::Utc::now().naive_utc();
    let mut active: volunteer_task::ActiveModel = task.into();
    active.status = Set(TaskStatus::InProgress);
    active.actual_start_time = Set(Some(now));
    active.updated_at = Set(now);
    let task = active.update(&db).await?;

    info!("Task {} started by volunteer {}", task.id, caller.id);
    let (user_names, ngo_names) = names_for(&db, std::slice::from_ref(&task)).await?;
    Ok(Json(TaskResponse::from_parts(task, &user_names, &ngo_names)))
}

/// POST /tasks/:id/complete - stamps the end time, derives hours_logged, and
/// bumps the volunteer profile counters in the same transaction. A volunteer
/// without a profile still gets the task update.
pub async fn complete(
    Extension(db): Extension<DatabaseConnection>,
    Extension(caller): Extension<CurrentUser>,
    Path(task_id): Path<i32>,
    body: Option<Json<CompleteTaskRequest>>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = find_scoped(&db, caller, task_id).await?;
    check_actor(caller, &task)?;
    if task.status != TaskStatus::InProgress {
        return Err(bad_transition(&task, TaskStatus::Completed));
    }

    let now = chrono::Utc::now().naive_utc();
    let hours = match task.actual_start_time {
        Some(start) => (now - start).num_seconds() as f64 / 3600.0,
        None => 0.0,
    };
    let volunteer_id = task.volunteer_id;

    let txn = db.begin().await?;

    let mut active: volunteer_task::ActiveModel = task.into();
    active.status = Set(TaskStatus::Completed);
    active.actual_end_time = Set(Some(now));
    active.hours_logged = Set(hours);
    active.completion_notes = Set(body.and_then(|Json(b)| b.notes));
    active.updated_at = Set(now);
    let task = active.update(&txn).await?;

    VolunteerProfile::update_many()
        .col_expr(
            volunteer_profile::Column::TotalHours,
            Expr::col(volunteer_profile::Column::TotalHours).add(hours),
        )
        .col_expr(
            volunteer_profile::Column::TasksCompleted,
            Expr::col(volunteer_profile::Column::TasksCompleted).add(1),
        )
        .col_expr(volunteer_profile::Column::UpdatedAt, Expr::value(now))
        .filter(volunteer_profile::Column::UserId.eq(volunteer_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    tracing::Span::current()
        .record("table", "volunteer_tasks")
        .record("action", "complete_task")
        .record("user_id", caller.id)
        .record("business_event", "task completed");
    metrics::counter!("seniorcare_tasks_completed_total").increment(1);

    info!(
        "Task {} completed by volunteer {} ({:.2} hours)",
        task.id, volunteer_id, hours
    );
    let (user_names, ngo_names) = names_for(&db, std::slice::from_ref(&task)).await?;
    Ok(Json(TaskResponse::from_parts(task, &user_names, &ngo_names)))
}
