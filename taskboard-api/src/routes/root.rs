/// Service root, connectivity probe and fallback
///
/// # Endpoints
///
/// - `GET /` - Welcome message
/// - `GET /connect` - Checks out a database connection and pings it
/// - anything unmatched - 404

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::Uri, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Plain message body
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

pub async fn welcome() -> Json<MessageResponse> {
    MessageResponse::new("Welcome to the Taskboard API")
}

/// Database connectivity check
///
/// The connection goes back to the pool when `conn` drops, whether the
/// ping succeeded or not.
///
/// # Errors
///
/// - `503 Service Unavailable`: no connection could be obtained or the ping failed
pub async fn connect(State(state): State<AppState>) -> ApiResult<Json<MessageResponse>> {
    info!("Attempting to connect to the database");

    let mut conn = state.db.acquire().await?;
    sqlx::query("SELECT 1").execute(&mut *conn).await?;
    drop(conn);

    info!("Database connection released");
    Ok(MessageResponse::new(
        "Connection to database established successfully.",
    ))
}

/// Handler for every unmatched route
pub async fn not_found(uri: Uri) -> ApiError {
    warn!(path = %uri.path(), "No route matched");
    ApiError::NotFound("Not Found".to_string())
}
