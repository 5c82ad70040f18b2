/// Database connection pool management
///
/// Handlers never open connections themselves. A single `PgPool` is built at
/// startup and shared through application state; each operation checks a
/// connection out and the pool takes it back when the guard is dropped,
/// on success and error paths alike.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         database: "tasks".to_string(),
///         username: "postgres".to_string(),
///         password: std::env::var("DATABASE_PASSWORD")?,
///         ..Default::default()
///     };
///
///     let pool = create_pool(&config).await?;
///
///     let row: (i64,) = sqlx::query_as("SELECT $1")
///         .bind(42i64)
///         .fetch_one(&pool)
///         .await?;
///
///     Ok(())
/// }
/// ```

use crate::error::StoreResult;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Connection parameters and pool tuning
///
/// All timeouts are in seconds so they can be read straight from
/// environment variables.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Server host name or address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Database name
    pub database: String,

    /// Login role
    pub username: String,

    /// Login password
    pub password: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of idle connections kept warm
    pub min_connections: u32,

    /// How long to wait for a free connection before giving up
    pub connect_timeout_seconds: u64,

    /// Idle connections older than this are closed (None = never)
    pub idle_timeout_seconds: Option<u64>,

    /// Connections older than this are recycled (None = never)
    pub max_lifetime_seconds: Option<u64>,

    /// Ping each connection before handing it out
    pub test_before_acquire: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            database: String::new(),
            username: String::new(),
            password: String::new(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_seconds: 30,
            idle_timeout_seconds: Some(600),
            max_lifetime_seconds: Some(1800),
            test_before_acquire: true,
        }
    }
}

// Hand-written so the password never reaches a log line.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout_seconds", &self.connect_timeout_seconds)
            .field("idle_timeout_seconds", &self.idle_timeout_seconds)
            .field("max_lifetime_seconds", &self.max_lifetime_seconds)
            .field("test_before_acquire", &self.test_before_acquire)
            .finish()
    }
}

impl DatabaseConfig {
    /// Builds driver connect options from the discrete parameters
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.username)
            .password(&self.password)
            .application_name("taskboard")
    }
}

/// Creates the pool and verifies the database answers
///
/// # Errors
///
/// Returns `StoreError::Connectivity` when the server is unreachable or
/// rejects the credentials. Callers at startup should treat this as fatal.
pub async fn create_pool(config: &DatabaseConfig) -> StoreResult<PgPool> {
    info!(
        host = %config.host,
        port = config.port,
        database = %config.database,
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Creating database connection pool"
    );

    let mut pool_options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .test_before_acquire(config.test_before_acquire);

    if let Some(idle_timeout) = config.idle_timeout_seconds {
        pool_options = pool_options.idle_timeout(Duration::from_secs(idle_timeout));
        debug!(idle_timeout_seconds = idle_timeout, "Set idle timeout");
    }

    if let Some(max_lifetime) = config.max_lifetime_seconds {
        pool_options = pool_options.max_lifetime(Duration::from_secs(max_lifetime));
        debug!(max_lifetime_seconds = max_lifetime, "Set max lifetime");
    }

    let pool = pool_options.connect_with(config.connect_options()).await?;

    health_check(&pool).await?;

    info!("Database connection pool created successfully");
    Ok(pool)
}

/// Runs `SELECT 1` on a pooled connection
pub async fn health_check(pool: &PgPool) -> StoreResult<()> {
    debug!("Performing database health check");

    let result: (i32,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;

    if result.0 == 1 {
        debug!("Database health check passed");
        Ok(())
    } else {
        warn!("Database health check returned unexpected value: {}", result.0);
        Err(sqlx::Error::Protocol("Health check returned unexpected value".into()).into())
    }
}

/// Snapshot of pool occupancy
#[derive(Debug, Clone)]
pub struct PoolStats {
    /// Connections currently checked out
    pub active_connections: usize,

    /// Connections sitting idle in the pool
    pub idle_connections: usize,

    /// All open connections
    pub total_connections: usize,
}

pub fn get_pool_stats(pool: &PgPool) -> PoolStats {
    let size = pool.size();
    let idle = pool.num_idle() as u32;

    PoolStats {
        active_connections: size.saturating_sub(idle) as usize,
        idle_connections: idle as usize,
        total_connections: size as usize,
    }
}

/// Closes every connection; call once during shutdown
pub async fn close_pool(pool: PgPool) {
    info!("Closing database connection pool");
    pool.close().await;
    info!("Database connection pool closed");
}
