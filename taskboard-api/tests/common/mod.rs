//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - Test database pool with the schema in place
//! - An in-process router
//! - Fixture users with cleanup
//! - Request helpers returning status and parsed JSON
//!
//! Connection parameters come from the same variables the server reads
//! (`DATABASE_NAME`, `DATABASE_USER`, ...); unset values fall back to a
//! local `taskboard_test` database.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::{ApiConfig, Config};
use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
use taskboard_shared::db::schema::initialize_schema;
use taskboard_shared::models::user::{CreateUser, User};
use std::env;
use tower::ServiceExt;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    users: Vec<i32>,
}

/// Builds configuration for the test database
pub fn test_config() -> Config {
    let database = DatabaseConfig {
        host: env::var("DATABASE_HOST").unwrap_or_else(|_| "localhost".to_string()),
        port: env::var("DATABASE_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5432),
        database: env::var("DATABASE_NAME").unwrap_or_else(|_| "taskboard_test".to_string()),
        username: env::var("DATABASE_USER").unwrap_or_else(|_| "postgres".to_string()),
        password: env::var("DATABASE_PASSWORD").unwrap_or_else(|_| "postgres".to_string()),
        max_connections: 5,
        ..Default::default()
    };

    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database,
    }
}

impl TestContext {
    /// Creates a context with a ready schema
    pub async fn new() -> anyhow::Result<Self> {
        let config = test_config();

        let db = create_pool(&config.database).await?;
        initialize_schema(&db).await?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            users: Vec::new(),
        })
    }

    /// Creates a user that is deleted (with its tasks) on cleanup
    pub async fn create_user(&mut self, name: &str) -> anyhow::Result<User> {
        let user = User::create(&self.db, CreateUser { name: name.to_string() }).await?;
        self.users.push(user.user_id);
        Ok(user)
    }

    /// Sends a request through the router
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&body).into_owned())
            })
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn send_json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Deletes fixture users; their tasks go with them
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        for user_id in &self.users {
            User::delete(&self.db, *user_id).await?;
        }
        Ok(())
    }
}
