/// Task endpoints
///
/// # Endpoints
///
/// - `GET /tasks` - List tasks, optionally for one user (`?user_id=`)
/// - `POST /tasks` - Create a task
/// - `PUT /tasks/:task_id` - Replace a task's writable fields
///
/// Writes run inside a transaction. Returning early with `?` drops the
/// transaction, which rolls it back before the connection goes back to the
/// pool.

use crate::{
    app::AppState,
    error::ApiResult,
    extract::ValidatedJson,
};
use axum::{
    extract::{rejection::PathRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Deserializer, Serialize};
use taskboard_shared::models::task::{Task, TaskInput, TaskStatus};
use tracing::{error, info, warn};
use validator::Validate;

/// Body for both create and replace
///
/// `description` may be omitted (stored as null) and `status` defaults to
/// `pending`. Unknown status strings fail deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 10000, message = "Description must be at most 10000 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    pub status: TaskStatus,

    #[serde(deserialize_with = "int_or_numeric_string")]
    pub user_id: i32,
}

/// Accepts `3` as well as `"3"`; form inputs submit numbers as strings
fn int_or_numeric_string<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i32),
        Str(String),
    }

    match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(value) => Ok(value),
        IntOrString::Str(raw) => raw.trim().parse().map_err(|_| {
            serde::de::Error::invalid_value(serde::de::Unexpected::Str(&raw), &"an integer")
        }),
    }
}

impl From<TaskRequest> for TaskInput {
    fn from(req: TaskRequest) -> Self {
        TaskInput {
            title: req.title,
            description: req.description,
            status: req.status,
            user_id: req.user_id,
        }
    }
}

/// Query string for `GET /tasks`
#[derive(Debug, Default, Deserialize)]
pub struct ListTasksQuery {
    /// Owner filter; only its presence matters, so `0` still filters
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub user_id: Option<i32>,
}

/// Treats `?user_id=` (empty value) the same as an absent parameter
fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Lists tasks
///
/// # Response
///
/// ```json
/// [
///   {
///     "id": 1,
///     "title": "Write report",
///     "description": null,
///     "status": "pending",
///     "created_at": "2025-01-03T12:00:00Z",
///     "user_id": 1
///   }
/// ]
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: `user_id` is not an integer
pub async fn list_tasks(
    State(state): State<AppState>,
    query: Result<Query<ListTasksQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Task>>> {
    let Query(query) = query?;
    info!(user_id = ?query.user_id, "Fetching tasks");

    let tasks = Task::list(&state.db, query.user_id).await?;

    info!(count = tasks.len(), "Fetched tasks");
    Ok(Json(tasks))
}

/// Creates a task
///
/// # Endpoint
///
/// ```text
/// POST /tasks
/// Content-Type: application/json
///
/// { "title": "Write report", "description": "Q3", "status": "pending", "user_id": 1 }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: malformed JSON
/// - `422 Unprocessable Entity`: empty title, unknown status, or `user_id` names no user
/// - `503 Service Unavailable`: database unreachable
pub async fn create_task(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<TaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    info!(title = %req.title, user_id = req.user_id, "Creating task");

    let input = TaskInput::from(req);
    let mut tx = state.db.begin().await?;

    let task = match Task::create(&mut *tx, &input).await {
        Ok(task) => task,
        Err(e) if e.is_client_error() => {
            warn!(user_id = input.user_id, error = %e, "Task creation rejected");
            return Err(e.into());
        }
        Err(e) => {
            error!(error = %e, "Task creation failed, rolling back");
            return Err(e.into());
        }
    };

    tx.commit().await?;

    info!(task_id = task.id, "Task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// Replaces a task's title, description, status and owner
///
/// `id` and `created_at` are never modified.
///
/// # Errors
///
/// - `400 Bad Request`: malformed JSON or non-integer `task_id`
/// - `404 Not Found`: no task has this id
/// - `422 Unprocessable Entity`: empty title, unknown status, or `user_id` names no user
pub async fn update_task(
    State(state): State<AppState>,
    task_id: Result<Path<i32>, PathRejection>,
    ValidatedJson(req): ValidatedJson<TaskRequest>,
) -> ApiResult<Json<Task>> {
    let Path(task_id) = task_id?;
    info!(task_id, "Updating task");

    let input = TaskInput::from(req);
    let mut tx = state.db.begin().await?;

    let task = match Task::update(&mut *tx, task_id, &input).await {
        Ok(task) => task,
        Err(e) if e.is_client_error() => {
            warn!(task_id, error = %e, "Task update rejected");
            return Err(e.into());
        }
        Err(e) => {
            error!(task_id, error = %e, "Task update failed, rolling back");
            return Err(e.into());
        }
    };

    tx.commit().await?;

    info!(task_id = task.id, "Task updated");
    Ok(Json(task))
}
