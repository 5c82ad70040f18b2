//! # Taskboard API Server
//!
//! Serves the task tracking HTTP API on top of PostgreSQL.
//!
//! Startup order: configuration, connection pool (fails if the database is
//! unreachable), schema initialization, then the listener. A failure at any
//! step exits before traffic is accepted.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_NAME=tasks DATABASE_USER=postgres cargo run -p taskboard-api
//! ```

use anyhow::Context;
use taskboard_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskboard_shared::db::{
    pool::{close_pool, create_pool},
    schema::initialize_schema,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "taskboard_api=debug,taskboard_shared=debug,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env may carry LOG_FORMAT, so load it before tracing starts
    dotenvy::dotenv().ok();
    init_tracing();

    tracing::info!(
        "Taskboard API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::debug!(database = ?config.database, "Configuration loaded");

    let pool = create_pool(&config.database)
        .await
        .context("Failed to connect to the database")?;

    initialize_schema(&pool)
        .await
        .context("Failed to initialize the database schema")?;

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(pool.clone(), config));

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received, draining connections...");
    close_pool(pool).await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
