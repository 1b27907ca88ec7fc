// Matchmaking DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A recorded match between two attendees
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MatchRecord {
    pub id: Uuid,
    pub user_a: Uuid,
    pub user_b: Uuid,
    pub event_id: Uuid,
    pub score: i32,
    pub created_at: DateTime<Utc>,
}

/// Request for matchmaking recommendations. Candidates are drawn from
/// every registered visitor and exhibitor; registration is not
/// event-scoped.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecommendRequest {
    /// The attendee asking for recommendations
    pub user_id: Uuid,
    /// Maximum number of recommendations (default 10)
    #[serde(default)]
    pub limit: Option<i64>,
}

/// One scored recommendation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Recommendation {
    pub user_id: Uuid,
    pub name: String,
    pub company: Option<String>,
    pub job_title: Option<String>,
    /// Symmetric match score, 0-100
    pub score: i32,
}
