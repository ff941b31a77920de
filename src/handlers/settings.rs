use std::collections::BTreeMap;

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use tracing::warn;

use crate::errors::ServiceError;
use crate::events::Event;
use crate::handlers::common::MessageResponse;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_settings).put(update_settings))
}

/// Return all settings as a key/value map
#[utoipa::path(
    get,
    path = "/api/v1/settings",
    responses(
        (status = 200, description = "Settings map, defaults included for unwritten keys")
    ),
    tag = "settings"
)]
pub async fn get_settings(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let settings = state.services.settings.get_all().await?;
    Ok(Json(settings))
}

/// Upsert the given settings keys
#[utoipa::path(
    put,
    path = "/api/v1/settings",
    responses(
        (status = 200, description = "Settings updated", body = MessageResponse),
        (status = 400, description = "Empty body", body = crate::errors::ErrorResponse)
    ),
    tag = "settings"
)]
pub async fn update_settings(
    State(state): State<AppState>,
    Json(payload): Json<BTreeMap<String, String>>,
) -> Result<impl IntoResponse, ServiceError> {
    let keys: Vec<String> = payload.keys().cloned().collect();
    state.services.settings.update(payload).await?;

    if let Err(e) = state.event_sender.send(Event::SettingsUpdated { keys }).await {
        warn!(error = %e, "Failed to publish settings updated event");
    }

    Ok(Json(MessageResponse::new("Settings updated successfully")))
}
