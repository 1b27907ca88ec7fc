// Lead DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use expopass_core::LeadStatus;

/// A lead captured by an exhibitor scanning a visitor badge
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Lead {
    pub id: Uuid,
    pub visitor_id: Uuid,
    pub exhibitor_id: Uuid,
    pub event_id: Uuid,
    /// Weighted heuristic score, 0-100
    #[schema(example = 75)]
    pub score: i32,
    pub status: LeadStatus,
    pub notes: Option<String>,
    pub follow_up_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Exhibitor edit of a captured lead. Only provided fields will be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateLeadRequest {
    #[serde(default)]
    pub status: Option<LeadStatus>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub follow_up_date: Option<DateTime<Utc>>,
}
