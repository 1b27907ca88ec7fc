// Badge HTTP routes (print workflow)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use expopass_contracts::{Badge, BulkBadgeStatusRequest};
use expopass_core::BadgeStatus;
use expopass_storage::{BadgeRow, Database};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// App state for badge routes
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

/// Create badge routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/badges/:badge_id", get(get_badge).delete(delete_badge))
        .route("/v1/badges/:badge_id/print", post(mark_printed))
        .route("/v1/badges/:badge_id/reprint", post(mark_reprint))
        .route("/v1/badges/bulk-status", post(bulk_status))
        .with_state(state)
}

pub(crate) fn row_to_badge(row: BadgeRow) -> Badge {
    let b = row.into_badge();
    Badge {
        id: b.id,
        user_id: b.user_id,
        qr_payload: b.qr_payload,
        category: b.category,
        status: b.status,
        template: b.template,
        created_at: b.created_at,
        updated_at: b.updated_at,
    }
}

/// GET /v1/badges/{badge_id} - Get badge by ID
#[utoipa::path(
    get,
    path = "/v1/badges/{badge_id}",
    params(
        ("badge_id" = Uuid, Path, description = "Badge ID")
    ),
    responses(
        (status = 200, description = "Badge found", body = Badge),
        (status = 404, description = "Badge not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "badges"
)]
pub async fn get_badge(
    State(state): State<AppState>,
    Path(badge_id): Path<Uuid>,
) -> Result<Json<Badge>, StatusCode> {
    let badge = state
        .db
        .get_badge(badge_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get badge: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(row_to_badge(badge)))
}

/// DELETE /v1/badges/{badge_id} - Revoke a badge
#[utoipa::path(
    delete,
    path = "/v1/badges/{badge_id}",
    params(
        ("badge_id" = Uuid, Path, description = "Badge ID")
    ),
    responses(
        (status = 204, description = "Badge deleted"),
        (status = 404, description = "Badge not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "badges"
)]
pub async fn delete_badge(
    State(state): State<AppState>,
    Path(badge_id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let deleted = state.db.delete_badge(badge_id).await.map_err(|e| {
        tracing::error!("Failed to delete badge: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

/// POST /v1/badges/{badge_id}/print - Mark a badge as printed
#[utoipa::path(
    post,
    path = "/v1/badges/{badge_id}/print",
    params(
        ("badge_id" = Uuid, Path, description = "Badge ID")
    ),
    responses(
        (status = 200, description = "Badge marked printed", body = Badge),
        (status = 404, description = "Badge not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "badges"
)]
pub async fn mark_printed(
    State(state): State<AppState>,
    Path(badge_id): Path<Uuid>,
) -> Result<Json<Badge>, StatusCode> {
    set_status(&state, badge_id, BadgeStatus::Printed).await
}

/// POST /v1/badges/{badge_id}/reprint - Queue a badge for reprinting
#[utoipa::path(
    post,
    path = "/v1/badges/{badge_id}/reprint",
    params(
        ("badge_id" = Uuid, Path, description = "Badge ID")
    ),
    responses(
        (status = 200, description = "Badge queued for reprint", body = Badge),
        (status = 404, description = "Badge not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "badges"
)]
pub async fn mark_reprint(
    State(state): State<AppState>,
    Path(badge_id): Path<Uuid>,
) -> Result<Json<Badge>, StatusCode> {
    set_status(&state, badge_id, BadgeStatus::Reprint).await
}

async fn set_status(
    state: &AppState,
    badge_id: Uuid,
    status: BadgeStatus,
) -> Result<Json<Badge>, StatusCode> {
    let badge = state
        .db
        .set_badge_status(badge_id, status)
        .await
        .map_err(|e| {
            tracing::error!("Failed to set badge status: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(row_to_badge(badge)))
}

/// Result of a bulk badge status update
#[derive(Debug, Serialize, ToSchema)]
pub struct BulkStatusResponse {
    /// Number of badges actually updated
    pub updated: u64,
}

/// POST /v1/badges/bulk-status - Update many badges at once (print runs)
#[utoipa::path(
    post,
    path = "/v1/badges/bulk-status",
    request_body = BulkBadgeStatusRequest,
    responses(
        (status = 200, description = "Badges updated", body = BulkStatusResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "badges"
)]
pub async fn bulk_status(
    State(state): State<AppState>,
    Json(req): Json<BulkBadgeStatusRequest>,
) -> Result<Json<BulkStatusResponse>, StatusCode> {
    let updated = state
        .db
        .bulk_set_badge_status(&req.badge_ids, req.status)
        .await
        .map_err(|e| {
            tracing::error!("Failed to bulk-update badges: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(BulkStatusResponse { updated }))
}
