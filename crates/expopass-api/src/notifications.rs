// Notification HTTP routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use expopass_contracts::{ListResponse, Notification};
use expopass_storage::{Database, NotificationRow};
use std::sync::Arc;
use uuid::Uuid;

/// App state for notification routes
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

/// Create notification routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/attendees/:attendee_id/notifications",
            get(list_notifications),
        )
        .route("/v1/notifications/:notification_id/read", post(mark_read))
        .with_state(state)
}

fn row_to_notification(row: NotificationRow) -> Notification {
    Notification {
        id: row.id,
        user_id: row.user_id,
        kind: row.kind,
        body: row.body,
        read: row.read,
        created_at: row.created_at,
    }
}

/// GET /v1/attendees/{attendee_id}/notifications - An attendee's notifications
#[utoipa::path(
    get,
    path = "/v1/attendees/{attendee_id}/notifications",
    params(
        ("attendee_id" = Uuid, Path, description = "Attendee ID")
    ),
    responses(
        (status = 200, description = "Notifications, newest first", body = ListResponse<Notification>),
        (status = 500, description = "Internal server error")
    ),
    tag = "notifications"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    Path(attendee_id): Path<Uuid>,
) -> Result<Json<ListResponse<Notification>>, StatusCode> {
    let rows = state
        .db
        .list_notifications_for_user(attendee_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list notifications: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(ListResponse::new(
        rows.into_iter().map(row_to_notification).collect(),
    )))
}

/// POST /v1/notifications/{notification_id}/read - Mark a notification read
#[utoipa::path(
    post,
    path = "/v1/notifications/{notification_id}/read",
    params(
        ("notification_id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 204, description = "Notification marked read"),
        (status = 404, description = "Notification not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notifications"
)]
pub async fn mark_read(
    State(state): State<AppState>,
    Path(notification_id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let updated = state
        .db
        .mark_notification_read(notification_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to mark notification read: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    if updated {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}
