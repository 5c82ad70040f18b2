/// Database models for Taskboard
///
/// # Models
///
/// - `user`: task owners; disabled users are hidden from listings
/// - `task`: units of work owned by exactly one user
///
/// Every operation takes a `PgExecutor`, so it runs equally against the
/// pool (reads) or inside a transaction (writes).
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
///     description: None,
///     status: TaskStatus::Pending,
///     user_id: 1,
/// }).await?;
/// tx.commit().await?;
/// # Ok(())
/// # }
/// ```

pub mod task;
pub mod user;
