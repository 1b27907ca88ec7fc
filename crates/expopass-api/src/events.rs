// Event HTTP routes (event registry + daily stats)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use expopass_contracts::{DailyStat, ListResponse};
use expopass_storage::{models::CreateEvent, Database, EventRow};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// App state for event routes
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

/// Create event routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/events", post(create_event).get(list_events))
        .route("/v1/events/:event_id", get(get_event))
        .route("/v1/events/:event_id/stats/daily", get(daily_stats))
        .with_state(state)
}

/// An event attendees check in to
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Request to create an event
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    #[schema(example = "Tech Expo 2026")]
    pub name: String,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
}

fn row_to_event(row: EventRow) -> Event {
    Event {
        id: row.id,
        name: row.name,
        starts_at: row.starts_at,
        ends_at: row.ends_at,
        created_at: row.created_at,
    }
}

/// POST /v1/events - Create a new event
#[utoipa::path(
    post,
    path = "/v1/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created successfully", body = Event),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), StatusCode> {
    let row = state
        .db
        .create_event(CreateEvent {
            name: req.name,
            starts_at: req.starts_at,
            ends_at: req.ends_at,
        })
        .await
        .map_err(|e| {
            tracing::error!("Failed to create event: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok((StatusCode::CREATED, Json(row_to_event(row))))
}

/// GET /v1/events - List all events
#[utoipa::path(
    get,
    path = "/v1/events",
    responses(
        (status = 200, description = "List of events", body = ListResponse<Event>),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<Event>>, StatusCode> {
    let rows = state.db.list_events().await.map_err(|e| {
        tracing::error!("Failed to list events: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(ListResponse::new(
        rows.into_iter().map(row_to_event).collect(),
    )))
}

/// GET /v1/events/{event_id} - Get event by ID
#[utoipa::path(
    get,
    path = "/v1/events/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Event>, StatusCode> {
    let row = state
        .db
        .get_event(event_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get event: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(row_to_event(row)))
}

/// GET /v1/events/{event_id}/stats/daily - Per-day activity counters
#[utoipa::path(
    get,
    path = "/v1/events/{event_id}/stats/daily",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Daily counters in day order", body = ListResponse<DailyStat>),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn daily_stats(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<ListResponse<DailyStat>>, StatusCode> {
    let rows = state.db.list_daily_stats(event_id).await.map_err(|e| {
        tracing::error!("Failed to list daily stats: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let stats = rows
        .into_iter()
        .map(|r| DailyStat {
            event_id: r.event_id,
            day: r.day,
            check_ins: r.check_ins,
            check_outs: r.check_outs,
            leads: r.leads,
            matches: r.matches,
        })
        .collect();

    Ok(Json(ListResponse::new(stats)))
}
