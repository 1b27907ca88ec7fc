// App settings HTTP routes (the shared runtime config document)

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use expopass_contracts::{AppSettings, UpdateSettingsRequest};
use expopass_storage::{models::UpdateAppSettings, Database};
use std::sync::Arc;

/// App state for settings routes
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

/// Create settings routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/settings", get(get_settings).patch(update_settings))
        .with_state(state)
}

/// GET /v1/settings - Read the global settings
#[utoipa::path(
    get,
    path = "/v1/settings",
    responses(
        (status = 200, description = "Current settings", body = AppSettings),
        (status = 500, description = "Internal server error")
    ),
    tag = "settings"
)]
pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<AppSettings>, StatusCode> {
    let settings = state.db.get_app_settings().await.map_err(|e| {
        tracing::error!("Failed to load settings: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(AppSettings::from(settings.into_settings())))
}

/// PATCH /v1/settings - Organizer update of the global settings
#[utoipa::path(
    patch,
    path = "/v1/settings",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings updated", body = AppSettings),
        (status = 500, description = "Internal server error")
    ),
    tag = "settings"
)]
pub async fn update_settings(
    State(state): State<AppState>,
    Json(req): Json<UpdateSettingsRequest>,
) -> Result<Json<AppSettings>, StatusCode> {
    let input = UpdateAppSettings {
        event_id: req.event_id,
        app_name: req.app_name,
        logo_url: req.logo_url,
    };

    let settings = state.db.update_app_settings(input).await.map_err(|e| {
        tracing::error!("Failed to update settings: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(AppSettings::from(settings.into_settings())))
}
