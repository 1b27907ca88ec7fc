// Notification DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// An in-app notification (lead captured, match made)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Notification kind, e.g. "lead.captured" or "match.created"
    #[schema(example = "lead.captured")]
    pub kind: String,
    pub body: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
