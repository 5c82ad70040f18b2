/// Database layer for Taskboard
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with startup health check
/// - `schema`: idempotent table creation run before the server accepts traffic
///
/// Models and their queries live in the crate-level `models` module.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::db::{pool::{create_pool, DatabaseConfig}, schema::initialize_schema};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         database: "tasks".to_string(),
///         username: "postgres".to_string(),
///         ..Default::default()
///     };
///
///     let pool = create_pool(&config).await?;
///     initialize_schema(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod pool;
pub mod schema;
