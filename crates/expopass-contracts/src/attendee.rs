// Attendee DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use expopass_core::{CheckDirection, ScoreProfile, UserCategory};

/// A registered attendee as served by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Attendee {
    pub id: Uuid,
    /// Badge-facing identifier embedded in QR payloads
    #[schema(example = "usr_8f3k2")]
    pub external_id: String,
    pub name: String,
    pub email: String,
    pub login_email: Option<String>,
    pub category: UserCategory,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub phone: Option<String>,
    /// The attendee's active badge, if one has been issued
    pub badge_id: Option<Uuid>,
    pub check_in_count: i32,
    pub last_check_in: Option<DateTime<Utc>>,
    pub last_check_out: Option<DateTime<Utc>>,
    pub last_status: Option<CheckDirection>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration request. Creates the attendee and issues a pending badge
/// carrying the encoded QR payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateAttendeeRequest {
    #[schema(example = "Alice Chen")]
    pub name: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[serde(default)]
    pub login_email: Option<String>,
    pub category: UserCategory,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Badge-facing id; generated when omitted
    #[serde(default)]
    pub external_id: Option<String>,
    /// Scoring attributes (industry, interests, lead value, goals)
    #[serde(default)]
    pub profile: Option<ScoreProfileDto>,
}

/// Update request. Only provided fields will be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateAttendeeRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub login_email: Option<String>,
    #[serde(default)]
    pub category: Option<UserCategory>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub profile: Option<ScoreProfileDto>,
}

/// Scoring profile attributes as accepted over the wire
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ScoreProfileDto {
    #[serde(default)]
    #[schema(example = "Technology")]
    pub industry: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub lead_value: i64,
    #[serde(default)]
    pub networking_goals: Vec<String>,
}

impl ScoreProfileDto {
    /// Combine with the attendee's job title into the core scoring input
    pub fn into_profile(self, job_title: Option<String>) -> ScoreProfile {
        ScoreProfile {
            industry: self.industry,
            interests: self.interests,
            job_title,
            lead_value: self.lead_value,
            networking_goals: self.networking_goals,
        }
    }
}
