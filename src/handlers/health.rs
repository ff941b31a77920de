use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::db;
use crate::errors::ServiceError;
use crate::AppState;

/// Liveness check that also pings the database
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and database reachable"),
        (status = 503, description = "Database unreachable", body = crate::errors::ErrorResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    db::check_connection(&state.db).await?;
    Ok(Json(json!({ "status": "ok" })))
}
