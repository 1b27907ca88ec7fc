// Check-in feed HTTP routes (list + SSE)
//
// Check-in rows are append-only with time-ordered v7 ids, so the id
// doubles as a resumable stream cursor: clients pass the last id they
// saw and receive everything after it.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    routing::get,
    Json, Router,
};
use expopass_contracts::{CheckIn, ListResponse};
use expopass_storage::{CheckInRow, Database};
use futures::{
    stream::{self, Stream},
    StreamExt,
};
use serde::Deserialize;
use std::{convert::Infallible, sync::Arc, time::Duration};
use utoipa::IntoParams;
use uuid::Uuid;

const POLL_INTERVAL: Duration = Duration::from_millis(500);
const PAGE_SIZE: i64 = 200;

/// App state for check-in routes
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

/// Create check-in routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/events/:event_id/checkins", get(list_check_ins))
        .route("/v1/events/:event_id/checkins/sse", get(stream_check_ins))
        .route("/v1/attendees/:attendee_id/checkins", get(attendee_history))
        .with_state(state)
}

fn row_to_check_in(row: CheckInRow) -> CheckIn {
    let r = row.into_record();
    CheckIn {
        id: r.id,
        user_id: r.user_id,
        event_id: r.event_id,
        direction: r.direction,
        agent_id: r.agent_id,
        created_at: r.created_at,
    }
}

/// Query parameters for check-in listing and streaming
#[derive(Debug, Deserialize, IntoParams)]
pub struct CheckInQuery {
    /// Resume after this check-in id. Omit to start from the beginning.
    pub since: Option<Uuid>,
}

/// GET /v1/events/{event_id}/checkins - List check-ins for an event
#[utoipa::path(
    get,
    path = "/v1/events/{event_id}/checkins",
    params(
        ("event_id" = Uuid, Path, description = "Event ID"),
        CheckInQuery
    ),
    responses(
        (status = 200, description = "Check-ins in id order", body = ListResponse<CheckIn>),
        (status = 500, description = "Internal server error")
    ),
    tag = "checkins"
)]
pub async fn list_check_ins(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Query(query): Query<CheckInQuery>,
) -> Result<Json<ListResponse<CheckIn>>, StatusCode> {
    let rows = state
        .db
        .list_check_ins_for_event(event_id, query.since, PAGE_SIZE)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list check-ins: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(ListResponse::new(
        rows.into_iter().map(row_to_check_in).collect(),
    )))
}

/// GET /v1/events/{event_id}/checkins/sse - Stream check-ins (SSE)
///
/// The `id` field of each SSE event carries the check-in id; pass it
/// back as `?since=` to resume without gaps.
#[utoipa::path(
    get,
    path = "/v1/events/{event_id}/checkins/sse",
    params(
        ("event_id" = Uuid, Path, description = "Event ID"),
        CheckInQuery
    ),
    responses(
        (status = 200, description = "Check-in stream", content_type = "text/event-stream"),
        (status = 500, description = "Internal server error")
    ),
    tag = "checkins"
)]
pub async fn stream_check_ins(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Query(query): Query<CheckInQuery>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    tracing::info!(event_id = %event_id, since = ?query.since, "Starting check-in stream");

    let db = state.db.clone();

    let stream = stream::unfold(query.since, move |cursor| {
        let db = db.clone();
        async move {
            match db
                .list_check_ins_for_event(event_id, cursor, PAGE_SIZE)
                .await
            {
                Ok(rows) if !rows.is_empty() => {
                    let next_cursor = rows.last().map(|r| r.id);

                    let events: Vec<Result<SseEvent, Infallible>> = rows
                        .into_iter()
                        .map(|row| {
                            let check_in = row_to_check_in(row);
                            let json = serde_json::to_string(&check_in)
                                .unwrap_or_else(|_| "{}".to_string());

                            Ok(SseEvent::default()
                                .event("checkin")
                                .data(json)
                                .id(check_in.id.to_string()))
                        })
                        .collect();

                    Some((stream::iter(events), next_cursor))
                }
                Ok(_) => {
                    // caught up, wait before polling again
                    tokio::time::sleep(POLL_INTERVAL).await;
                    Some((stream::iter(vec![]), cursor))
                }
                Err(e) => {
                    tracing::error!("Failed to fetch check-ins: {}", e);
                    None
                }
            }
        }
    })
    .flatten();

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// GET /v1/attendees/{attendee_id}/checkins - An attendee's history
#[utoipa::path(
    get,
    path = "/v1/attendees/{attendee_id}/checkins",
    params(
        ("attendee_id" = Uuid, Path, description = "Attendee ID")
    ),
    responses(
        (status = 200, description = "Check-in history, newest first", body = ListResponse<CheckIn>),
        (status = 500, description = "Internal server error")
    ),
    tag = "checkins"
)]
pub async fn attendee_history(
    State(state): State<AppState>,
    Path(attendee_id): Path<Uuid>,
) -> Result<Json<ListResponse<CheckIn>>, StatusCode> {
    let rows = state
        .db
        .list_check_ins_for_user(attendee_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list attendee check-ins: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(ListResponse::new(
        rows.into_iter().map(row_to_check_in).collect(),
    )))
}
