// Check-in event DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use expopass_core::CheckDirection;

/// An immutable check-in/checkout log entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckIn {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub direction: CheckDirection,
    /// The agent who performed the scan, if any
    pub agent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
