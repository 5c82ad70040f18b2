/// Configuration management for the API server
///
/// This module loads configuration from environment variables (and a `.env`
/// file when present) into a type-safe struct. Credentials are never
/// compiled in.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 127.0.0.1)
/// - `API_PORT`: Port to bind to (default: 8002)
/// - `CORS_ORIGINS`: Comma-separated allowed origins, `*` for any (default: *)
/// - `DATABASE_HOST`: PostgreSQL host (default: localhost)
/// - `DATABASE_PORT`: PostgreSQL port (default: 5432)
/// - `DATABASE_NAME`: Database name (required)
/// - `DATABASE_USER`: Login role (required)
/// - `DATABASE_PASSWORD`: Login password (default: empty)
/// - `DATABASE_MAX_CONNECTIONS`: Pool ceiling (default: 10)
/// - `DATABASE_MIN_CONNECTIONS`: Idle connections kept open (default: 1)
/// - `DATABASE_CONNECT_TIMEOUT`: Seconds to wait for a connection (default: 30)
/// - `LOG_FORMAT`: `json` for JSON logs, anything else for text
/// - `RUST_LOG`: Log filter
///
/// # Example
///
/// ```no_run
/// use taskboard_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::Context;
use std::env;
use std::str::FromStr;
use taskboard_shared::db::pool::DatabaseConfig;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database connection and pool configuration
    pub database: DatabaseConfig,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins (`*` allows any)
    pub cors_origins: Vec<String>,
}

/// Reads an optional variable, falling back to `default` when unset
fn var_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} has an invalid value: {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}

/// Reads a variable that must be present and non-empty
fn required_var(name: &str) -> anyhow::Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => anyhow::bail!("{} environment variable is required", name),
    }
}

/// Splits a comma-separated origin list, dropping blanks
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `DATABASE_NAME` or `DATABASE_USER` is missing
    /// - A numeric variable does not parse
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = var_or("API_PORT", 8002u16)?;

        let mut cors_origins = parse_origins(&env::var("CORS_ORIGINS").unwrap_or_default());
        if cors_origins.is_empty() {
            cors_origins.push("*".to_string());
        }

        let defaults = DatabaseConfig::default();
        let database = DatabaseConfig {
            host: env::var("DATABASE_HOST").unwrap_or(defaults.host.clone()),
            port: var_or("DATABASE_PORT", defaults.port)?,
            database: required_var("DATABASE_NAME")?,
            username: required_var("DATABASE_USER")?,
            password: env::var("DATABASE_PASSWORD").unwrap_or_default(),
            max_connections: var_or("DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: var_or("DATABASE_MIN_CONNECTIONS", defaults.min_connections)?,
            connect_timeout_seconds: var_or(
                "DATABASE_CONNECT_TIMEOUT",
                defaults.connect_timeout_seconds,
            )?,
            ..defaults
        };

        if database.min_connections > database.max_connections {
            anyhow::bail!(
                "DATABASE_MIN_CONNECTIONS ({}) exceeds DATABASE_MAX_CONNECTIONS ({})",
                database.min_connections,
                database.max_connections
            );
        }

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
            },
            database,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Whether any origin may call the API
    pub fn allows_any_origin(&self) -> bool {
        self.api.cors_origins.iter().any(|origin| origin == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_origins(origins: &[&str]) -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8002,
                cors_origins: origins.iter().map(|o| o.to_string()).collect(),
            },
            database: DatabaseConfig::default(),
        }
    }

    #[test]
    fn test_bind_address() {
        let config = config_with_origins(&["*"]);
        assert_eq!(config.bind_address(), "127.0.0.1:8002");
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("http://localhost:3000, https://tasks.example.com ,"),
            vec!["http://localhost:3000", "https://tasks.example.com"]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn test_allows_any_origin() {
        assert!(config_with_origins(&["*"]).allows_any_origin());
        assert!(!config_with_origins(&["http://localhost:3000"]).allows_any_origin());
    }

    #[test]
    fn test_var_or_uses_default_when_unset() {
        let value: u16 = var_or("TASKBOARD_TEST_SURELY_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }
}
