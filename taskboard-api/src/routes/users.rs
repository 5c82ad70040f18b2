/// User endpoints
///
/// - `GET /users` - List enabled users

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use taskboard_shared::models::user::User;
use tracing::info;

/// Lists users whose `enabled` flag is set; disabled users are omitted
///
/// # Response
///
/// ```json
/// [
///   { "user_id": 1, "name": "Ana", "enabled": true, "created_at": "2025-01-03T12:00:00Z" }
/// ]
/// ```
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    info!("Fetching active users");

    let users = User::list_enabled(&state.db).await?;

    info!(count = users.len(), "Fetched active users");
    Ok(Json(users))
}
