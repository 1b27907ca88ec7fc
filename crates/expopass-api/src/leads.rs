// Lead management HTTP routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use expopass_contracts::{Lead, ListResponse, UpdateLeadRequest};
use expopass_storage::{models::UpdateLead, Database, LeadRow};
use std::sync::Arc;
use uuid::Uuid;

/// App state for lead routes
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

/// Create lead routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/exhibitors/:exhibitor_id/leads", get(list_leads))
        .route("/v1/leads/:lead_id", get(get_lead).patch(update_lead))
        .with_state(state)
}

fn row_to_lead(row: LeadRow) -> Lead {
    let l = row.into_lead();
    Lead {
        id: l.id,
        visitor_id: l.visitor_id,
        exhibitor_id: l.exhibitor_id,
        event_id: l.event_id,
        score: l.score,
        status: l.status,
        notes: l.notes,
        follow_up_date: l.follow_up_date,
        created_at: l.created_at,
        updated_at: l.updated_at,
    }
}

/// GET /v1/exhibitors/{exhibitor_id}/leads - Leads captured by an exhibitor
#[utoipa::path(
    get,
    path = "/v1/exhibitors/{exhibitor_id}/leads",
    params(
        ("exhibitor_id" = Uuid, Path, description = "Exhibitor ID")
    ),
    responses(
        (status = 200, description = "Leads, newest first", body = ListResponse<Lead>),
        (status = 500, description = "Internal server error")
    ),
    tag = "leads"
)]
pub async fn list_leads(
    State(state): State<AppState>,
    Path(exhibitor_id): Path<Uuid>,
) -> Result<Json<ListResponse<Lead>>, StatusCode> {
    let rows = state
        .db
        .list_leads_for_exhibitor(exhibitor_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list leads: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(ListResponse::new(
        rows.into_iter().map(row_to_lead).collect(),
    )))
}

/// GET /v1/leads/{lead_id} - Get lead by ID
#[utoipa::path(
    get,
    path = "/v1/leads/{lead_id}",
    params(
        ("lead_id" = Uuid, Path, description = "Lead ID")
    ),
    responses(
        (status = 200, description = "Lead found", body = Lead),
        (status = 404, description = "Lead not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "leads"
)]
pub async fn get_lead(
    State(state): State<AppState>,
    Path(lead_id): Path<Uuid>,
) -> Result<Json<Lead>, StatusCode> {
    let lead = state
        .db
        .get_lead(lead_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get lead: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(row_to_lead(lead)))
}

/// PATCH /v1/leads/{lead_id} - Update lead status / notes / follow-up
#[utoipa::path(
    patch,
    path = "/v1/leads/{lead_id}",
    params(
        ("lead_id" = Uuid, Path, description = "Lead ID")
    ),
    request_body = UpdateLeadRequest,
    responses(
        (status = 200, description = "Lead updated successfully", body = Lead),
        (status = 404, description = "Lead not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "leads"
)]
pub async fn update_lead(
    State(state): State<AppState>,
    Path(lead_id): Path<Uuid>,
    Json(req): Json<UpdateLeadRequest>,
) -> Result<Json<Lead>, StatusCode> {
    let input = UpdateLead {
        status: req.status,
        notes: req.notes,
        follow_up_date: req.follow_up_date,
    };

    let lead = state
        .db
        .update_lead(lead_id, input)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update lead: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(row_to_lead(lead)))
}
