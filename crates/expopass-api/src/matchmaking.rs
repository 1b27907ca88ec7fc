// Matchmaking HTTP routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use expopass_contracts::{ListResponse, MatchRecord, RecommendRequest, Recommendation};
use expopass_storage::{Database, MatchRow};
use std::sync::Arc;
use uuid::Uuid;

use crate::services::MatchmakingService;

/// App state for matchmaking routes
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub service: Arc<MatchmakingService>,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            service: Arc::new(MatchmakingService::new(db.clone())),
            db,
        }
    }
}

/// Create matchmaking routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/matchmaking/recommend", post(recommend))
        .route("/v1/attendees/:attendee_id/matches", get(list_matches))
        .with_state(state)
}

fn row_to_match(row: MatchRow) -> MatchRecord {
    let m = row.into_record();
    MatchRecord {
        id: m.id,
        user_a: m.user_a,
        user_b: m.user_b,
        event_id: m.event_id,
        score: m.score,
        created_at: m.created_at,
    }
}

/// POST /v1/matchmaking/recommend - Scored attendee recommendations
#[utoipa::path(
    post,
    path = "/v1/matchmaking/recommend",
    request_body = RecommendRequest,
    responses(
        (status = 200, description = "Recommendations, best first", body = ListResponse<Recommendation>),
        (status = 404, description = "User has no scoring profile"),
        (status = 500, description = "Internal server error")
    ),
    tag = "matchmaking"
)]
pub async fn recommend(
    State(state): State<AppState>,
    Json(req): Json<RecommendRequest>,
) -> Result<Json<ListResponse<Recommendation>>, StatusCode> {
    let recs = state
        .service
        .recommend(req.user_id, req.limit)
        .await
        .map_err(|e| {
            tracing::warn!("Recommendation failed: {}", e);
            StatusCode::NOT_FOUND
        })?;

    Ok(Json(ListResponse::new(recs)))
}

/// GET /v1/attendees/{attendee_id}/matches - Matches involving an attendee
#[utoipa::path(
    get,
    path = "/v1/attendees/{attendee_id}/matches",
    params(
        ("attendee_id" = Uuid, Path, description = "Attendee ID")
    ),
    responses(
        (status = 200, description = "Matches, newest first", body = ListResponse<MatchRecord>),
        (status = 500, description = "Internal server error")
    ),
    tag = "matchmaking"
)]
pub async fn list_matches(
    State(state): State<AppState>,
    Path(attendee_id): Path<Uuid>,
) -> Result<Json<ListResponse<MatchRecord>>, StatusCode> {
    let rows = state
        .db
        .list_matches_for_user(attendee_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list matches: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(ListResponse::new(
        rows.into_iter().map(row_to_match).collect(),
    )))
}

#[cfg(test)]
mod tests {
    use expopass_contracts::RecommendRequest;

    #[test]
    fn recommend_request_deserializes_minimal() {
        let json = r#"{ "user_id": "0193e4a8-0000-7000-8000-000000000001" }"#;

        let req: RecommendRequest = serde_json::from_str(json).unwrap();
        assert!(req.limit.is_none());
    }

    #[test]
    fn recommend_request_advertises_no_event_scope() {
        // Candidates are global; the request body is user + limit only.
        let req = RecommendRequest {
            user_id: uuid::Uuid::now_v7(),
            limit: Some(5),
        };

        let value = serde_json::to_value(&req).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["limit", "user_id"]);
    }
}
