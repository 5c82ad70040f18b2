/// User model and database operations
///
/// Users own tasks. There is no HTTP surface for creating, editing or
/// deleting them; the helpers beyond `list_enabled` serve administrative
/// tooling and tests.
///
/// Disabling a user hides it from `list_enabled` but keeps its tasks.
/// Deleting a user removes its tasks through `ON DELETE CASCADE`.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::user::{User, CreateUser};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let ana = User::create(&pool, CreateUser { name: "Ana".to_string() }).await?;
/// let visible = User::list_enabled(&pool).await?;
/// assert!(visible.iter().any(|u| u.user_id == ana.user_id));
/// # Ok(())
/// # }
/// ```

use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgExecutor;
use tracing::debug;

/// A task owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Server-assigned identifier
    pub user_id: i32,

    /// Display name (never empty)
    pub name: String,

    /// Whether the user shows up in listings
    pub enabled: bool,

    /// Insertion time, never modified
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
}

impl User {
    /// Returns every enabled user in database order
    pub async fn list_enabled<'e>(executor: impl PgExecutor<'e>) -> StoreResult<Vec<Self>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, name, enabled, created_at
            FROM users
            WHERE enabled = TRUE
            "#,
        )
        .fetch_all(executor)
        .await?;

        debug!(count = users.len(), "Loaded enabled users");
        Ok(users)
    }

    /// Inserts an enabled user
    pub async fn create<'e>(executor: impl PgExecutor<'e>, data: CreateUser) -> StoreResult<Self> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name)
            VALUES ($1)
            RETURNING user_id, name, enabled, created_at
            "#,
        )
        .bind(data.name)
        .fetch_one(executor)
        .await?;

        Ok(user)
    }

    /// Finds a user by id regardless of its enabled flag
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        user_id: i32,
    ) -> StoreResult<Option<Self>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, name, enabled, created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    /// Shows or hides a user in listings
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` when no user has this id.
    pub async fn set_enabled<'e>(
        executor: impl PgExecutor<'e>,
        user_id: i32,
        enabled: bool,
    ) -> StoreResult<Self> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET enabled = $2
            WHERE user_id = $1
            RETURNING user_id, name, enabled, created_at
            "#,
        )
        .bind(user_id)
        .bind(enabled)
        .fetch_optional(executor)
        .await?
        .ok_or(StoreError::NotFound("user"))
    }

    /// Deletes a user
    ///
    /// ⚠️  All tasks owned by the user are deleted with it (CASCADE).
    ///
    /// Returns whether a row was removed.
    pub async fn delete<'e>(executor: impl PgExecutor<'e>, user_id: i32) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
