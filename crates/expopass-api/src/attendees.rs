// Attendee CRUD HTTP routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use expopass_contracts::{
    Attendee, Badge, CreateAttendeeRequest, ListResponse, UpdateAttendeeRequest,
};
use expopass_storage::Database;
use std::sync::Arc;
use uuid::Uuid;

use crate::services::AttendeeService;

/// App state for attendee routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AttendeeService>,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            service: Arc::new(AttendeeService::new(db)),
        }
    }
}

/// Create attendee routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/attendees", post(create_attendee).get(list_attendees))
        .route(
            "/v1/attendees/:attendee_id",
            get(get_attendee)
                .patch(update_attendee)
                .delete(delete_attendee),
        )
        .route(
            "/v1/attendees/:attendee_id/badge",
            post(reissue_badge),
        )
        .route("/v1/attendees/by-email/:email", get(get_attendee_by_email))
        .with_state(state)
}

/// POST /v1/attendees - Register a new attendee (issues a badge)
#[utoipa::path(
    post,
    path = "/v1/attendees",
    request_body = CreateAttendeeRequest,
    responses(
        (status = 201, description = "Attendee registered successfully", body = Attendee),
        (status = 500, description = "Internal server error")
    ),
    tag = "attendees"
)]
pub async fn create_attendee(
    State(state): State<AppState>,
    Json(req): Json<CreateAttendeeRequest>,
) -> Result<(StatusCode, Json<Attendee>), StatusCode> {
    let attendee = state.service.register(req).await.map_err(|e| {
        tracing::error!("Failed to register attendee: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok((StatusCode::CREATED, Json(attendee)))
}

/// GET /v1/attendees - List all attendees
#[utoipa::path(
    get,
    path = "/v1/attendees",
    responses(
        (status = 200, description = "List of attendees", body = ListResponse<Attendee>),
        (status = 500, description = "Internal server error")
    ),
    tag = "attendees"
)]
pub async fn list_attendees(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<Attendee>>, StatusCode> {
    let attendees = state.service.list().await.map_err(|e| {
        tracing::error!("Failed to list attendees: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(ListResponse::new(attendees)))
}

/// GET /v1/attendees/{attendee_id} - Get attendee by ID
#[utoipa::path(
    get,
    path = "/v1/attendees/{attendee_id}",
    params(
        ("attendee_id" = Uuid, Path, description = "Attendee ID")
    ),
    responses(
        (status = 200, description = "Attendee found", body = Attendee),
        (status = 404, description = "Attendee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "attendees"
)]
pub async fn get_attendee(
    State(state): State<AppState>,
    Path(attendee_id): Path<Uuid>,
) -> Result<Json<Attendee>, StatusCode> {
    let attendee = state
        .service
        .get(attendee_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get attendee: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(attendee))
}

/// GET /v1/attendees/by-email/{email} - Get attendee by exact email
#[utoipa::path(
    get,
    path = "/v1/attendees/by-email/{email}",
    params(
        ("email" = String, Path, description = "Attendee email")
    ),
    responses(
        (status = 200, description = "Attendee found", body = Attendee),
        (status = 404, description = "Attendee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "attendees"
)]
pub async fn get_attendee_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Attendee>, StatusCode> {
    let attendee = state
        .service
        .get_by_email(&email)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get attendee by email: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(attendee))
}

/// PATCH /v1/attendees/{attendee_id} - Update attendee
#[utoipa::path(
    patch,
    path = "/v1/attendees/{attendee_id}",
    params(
        ("attendee_id" = Uuid, Path, description = "Attendee ID")
    ),
    request_body = UpdateAttendeeRequest,
    responses(
        (status = 200, description = "Attendee updated successfully", body = Attendee),
        (status = 404, description = "Attendee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "attendees"
)]
pub async fn update_attendee(
    State(state): State<AppState>,
    Path(attendee_id): Path<Uuid>,
    Json(req): Json<UpdateAttendeeRequest>,
) -> Result<Json<Attendee>, StatusCode> {
    let attendee = state
        .service
        .update(attendee_id, req)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update attendee: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(attendee))
}

/// DELETE /v1/attendees/{attendee_id} - Delete attendee
#[utoipa::path(
    delete,
    path = "/v1/attendees/{attendee_id}",
    params(
        ("attendee_id" = Uuid, Path, description = "Attendee ID")
    ),
    responses(
        (status = 204, description = "Attendee deleted successfully"),
        (status = 404, description = "Attendee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "attendees"
)]
pub async fn delete_attendee(
    State(state): State<AppState>,
    Path(attendee_id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let deleted = state.service.delete(attendee_id).await.map_err(|e| {
        tracing::error!("Failed to delete attendee: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

/// POST /v1/attendees/{attendee_id}/badge - Re-encode and re-issue the badge
#[utoipa::path(
    post,
    path = "/v1/attendees/{attendee_id}/badge",
    params(
        ("attendee_id" = Uuid, Path, description = "Attendee ID")
    ),
    responses(
        (status = 201, description = "Badge re-issued", body = Badge),
        (status = 404, description = "Attendee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "badges"
)]
pub async fn reissue_badge(
    State(state): State<AppState>,
    Path(attendee_id): Path<Uuid>,
) -> Result<(StatusCode, Json<Badge>), StatusCode> {
    let badge = state
        .service
        .reissue_badge(attendee_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to re-issue badge: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok((StatusCode::CREATED, Json(badge)))
}
