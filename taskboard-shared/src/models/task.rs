/// Task model and database operations
///
/// A task is owned by exactly one user and carries a status. Any status may
/// move to any other through an update.
///
/// Writes replace the whole mutable tuple (`title`, `description`,
/// `status`, `user_id`). `id` and `created_at` are set by the database on
/// insert and never touched again.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task::{Task, TaskInput, TaskStatus};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let mut tx = pool.begin().await?;
/// let task = Task::create(&mut *tx, &TaskInput {
///     title: "Write report".to_string(),
///     description: Some("Quarterly numbers".to_string()),
///     status: TaskStatus::Pending,
///     user_id: 1,
/// }).await?;
/// tx.commit().await?;
///
/// let owned = Task::list(&pool, Some(task.user_id)).await?;
/// # Ok(())
/// # }
/// ```

use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgExecutor;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Lifecycle status of a task
///
/// Stored as text; the database enforces the same three values with a
/// CHECK constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "pending")]
    Pending,

    #[serde(rename = "in progress")]
    InProgress,

    #[serde(rename = "completed")]
    Completed,
}

/// Raised when a stored or supplied status is not one of the known values
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid task status '{0}', expected one of: pending, in progress, completed")]
pub struct InvalidStatus(pub String);

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    /// Text form used on the wire and in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| InvalidStatus(s.to_string()))
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = InvalidStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Task row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Server-assigned identifier, increasing per insert
    pub id: i32,

    /// Short title (never empty)
    pub title: String,

    /// Optional free text
    pub description: Option<String>,

    /// Current status
    #[sqlx(try_from = "String")]
    pub status: TaskStatus,

    /// Insertion time, never modified
    pub created_at: DateTime<Utc>,

    /// Owning user
    pub user_id: i32,
}

/// Writable fields of a task, used for both insert and full replacement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInput {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub user_id: i32,
}

impl Task {
    /// Lists tasks, optionally restricted to one owner
    ///
    /// `Some(0)` is a real filter (and matches nothing unless a user 0
    /// exists); only `None` lists everything.
    pub async fn list<'e>(
        executor: impl PgExecutor<'e>,
        user_id: Option<i32>,
    ) -> StoreResult<Vec<Self>> {
        let tasks = match user_id {
            Some(user_id) => {
                sqlx::query_as::<_, Task>(
                    r#"
                    SELECT id, title, description, status, created_at, user_id
                    FROM tasks
                    WHERE user_id = $1
                    "#,
                )
                .bind(user_id)
                .fetch_all(executor)
                .await?
            }
            None => {
                sqlx::query_as::<_, Task>(
                    r#"
                    SELECT id, title, description, status, created_at, user_id
                    FROM tasks
                    "#,
                )
                .fetch_all(executor)
                .await?
            }
        };

        debug!(user_id = ?user_id, count = tasks.len(), "Loaded tasks");
        Ok(tasks)
    }

    /// Finds a task by id
    pub async fn find_by_id<'e>(executor: impl PgExecutor<'e>, id: i32) -> StoreResult<Option<Self>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, created_at, user_id
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(task)
    }

    /// Inserts a task and returns the stored row
    ///
    /// # Errors
    ///
    /// `StoreError::ForeignKeyViolation` when `user_id` names no user.
    pub async fn create<'e>(executor: impl PgExecutor<'e>, data: &TaskInput) -> StoreResult<Self> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, status, created_at, user_id
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.status.as_str())
        .bind(data.user_id)
        .fetch_one(executor)
        .await?;

        Ok(task)
    }

    /// Replaces the writable fields of an existing task
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` when no task has this id
    /// - `StoreError::ForeignKeyViolation` when `user_id` names no user
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        id: i32,
        data: &TaskInput,
    ) -> StoreResult<Self> {
        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $2,
                description = $3,
                status = $4,
                user_id = $5
            WHERE id = $1
            RETURNING id, title, description, status, created_at, user_id
            "#,
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.status.as_str())
        .bind(data.user_id)
        .fetch_optional(executor)
        .await?
        .ok_or(StoreError::NotFound("task"))
    }

    /// Counts all tasks
    pub async fn count<'e>(executor: impl PgExecutor<'e>) -> StoreResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(executor)
            .await?;

        Ok(count)
    }
}
