// Badge DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use expopass_core::{BadgeStatus, UserCategory};

/// A badge issued at registration, rendered as a QR code for scanning
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Badge {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Encoded QR payload (`userId|category|eventId|epoch_ms`)
    #[schema(example = "usr_8f3k2|visitor|evt_1|1735689600000")]
    pub qr_payload: String,
    pub category: UserCategory,
    pub status: BadgeStatus,
    pub template: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Bulk badge status update (organizer print runs)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkBadgeStatusRequest {
    pub badge_ids: Vec<Uuid>,
    pub status: BadgeStatus,
}
