// Scan resolution HTTP route
//
// POST /v1/scans always answers 200 with the uniform ScanOutcome body.
// A failed scan is a successful HTTP exchange; only a missing scanner
// record or missing event scope is a transport-level error.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use expopass_contracts::ScanRequest;
use expopass_core::{ScanInput, ScanOutcome, ScanResolver};
use expopass_storage::Database;
use std::sync::Arc;

/// App state for scan routes
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub resolver: Arc<ScanResolver<Database>>,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            resolver: Arc::new(ScanResolver::new(db.clone())),
            db,
        }
    }
}

/// Create scan routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/scans", post(submit_scan))
        .with_state(state)
}

/// POST /v1/scans - Resolve a decoded badge scan into an action
#[utoipa::path(
    post,
    path = "/v1/scans",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Scan outcome (success or structured failure)", body = ScanOutcome),
        (status = 404, description = "Scanner not registered"),
        (status = 409, description = "No event scope configured"),
        (status = 500, description = "Internal server error")
    ),
    tag = "scans"
)]
pub async fn submit_scan(
    State(state): State<AppState>,
    Json(req): Json<ScanRequest>,
) -> Result<Json<ScanOutcome>, StatusCode> {
    let scanner = state
        .db
        .get_user(req.scanner_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load scanner: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?
        .into_attendee();

    // explicit event beats the configured active event
    let event_id = match req.event_id {
        Some(id) => id,
        None => state
            .db
            .get_app_settings()
            .await
            .map_err(|e| {
                tracing::error!("Failed to load settings: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?
            .event_id
            .ok_or(StatusCode::CONFLICT)?,
    };

    let input = ScanInput {
        payload: req.payload,
        scanner,
        event_id,
        action_hint: req.action,
    };

    let outcome = state.resolver.resolve(&input).await;
    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use expopass_contracts::ScanRequest;
    use expopass_core::ScanAction;

    #[test]
    fn scan_request_deserializes_minimal() {
        let json = r#"{
            "payload": "usr_8f3k2|visitor|evt_1|1735689600000",
            "scanner_id": "0193e4a8-0000-7000-8000-000000000001"
        }"#;

        let req: ScanRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.payload, "usr_8f3k2|visitor|evt_1|1735689600000");
        assert!(req.event_id.is_none());
        assert!(req.action.is_none());
    }

    #[test]
    fn scan_request_deserializes_with_action_override() {
        let json = r#"{
            "payload": "usr_8f3k2",
            "scanner_id": "0193e4a8-0000-7000-8000-000000000001",
            "action": "checkout"
        }"#;

        let req: ScanRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.action, Some(ScanAction::Checkout));
    }
}
