// Domain entities shared by the API, storage, and resolver
//
// Every record that used to be a duck-typed document in the hosted store
// has an explicit type here; malformed rows are rejected at the storage
// boundary instead of propagating missing fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category/role of a registered user. The scanner's category decides
/// which action a scan performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum UserCategory {
    Visitor,
    Exhibitor,
    Agent,
    Organizer,
    Speaker,
    Sponsor,
    HostedBuyer,
    Unknown,
}

impl UserCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserCategory::Visitor => "visitor",
            UserCategory::Exhibitor => "exhibitor",
            UserCategory::Agent => "agent",
            UserCategory::Organizer => "organizer",
            UserCategory::Speaker => "speaker",
            UserCategory::Sponsor => "sponsor",
            UserCategory::HostedBuyer => "hosted_buyer",
            UserCategory::Unknown => "unknown",
        }
    }
}

impl From<&str> for UserCategory {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "visitor" => UserCategory::Visitor,
            "exhibitor" => UserCategory::Exhibitor,
            "agent" => UserCategory::Agent,
            "organizer" => UserCategory::Organizer,
            "speaker" => UserCategory::Speaker,
            "sponsor" => UserCategory::Sponsor,
            "hosted_buyer" | "hostedbuyer" => UserCategory::HostedBuyer,
            _ => UserCategory::Unknown,
        }
    }
}

impl std::fmt::Display for UserCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a check-in event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum CheckDirection {
    In,
    Out,
}

impl CheckDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckDirection::In => "in",
            CheckDirection::Out => "out",
        }
    }
}

impl From<&str> for CheckDirection {
    fn from(s: &str) -> Self {
        match s {
            "out" => CheckDirection::Out,
            _ => CheckDirection::In,
        }
    }
}

impl std::fmt::Display for CheckDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered attendee. `external_id` is the badge-facing identifier
/// embedded in QR payloads; it is distinct from the database primary key
/// so legacy badge ids (emails, short codes) keep working.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendee {
    pub id: Uuid,
    pub external_id: String,
    pub name: String,
    pub email: String,
    pub login_email: Option<String>,
    pub category: UserCategory,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub phone: Option<String>,
    /// Back-reference to the active badge, cleared when the badge is deleted
    pub badge_id: Option<Uuid>,
    pub check_in_count: i32,
    pub last_check_in: Option<DateTime<Utc>>,
    pub last_check_out: Option<DateTime<Utc>>,
    pub last_status: Option<CheckDirection>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Immutable check-in/checkout log entry. Never updated or deleted;
/// current attendance is derived from the latest record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub direction: CheckDirection,
    /// The agent who performed the scan, if any
    pub agent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Result of applying a check-in toggle: the appended record plus the
/// updated running counter from the user summary.
#[derive(Debug, Clone, Serialize)]
pub struct AppliedCheckIn {
    pub record: CheckInRecord,
    pub check_in_count: i32,
}

/// Status of a captured lead, mutated later by the exhibitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Discarded,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Discarded => "discarded",
        }
    }
}

impl From<&str> for LeadStatus {
    fn from(s: &str) -> Self {
        match s {
            "contacted" => LeadStatus::Contacted,
            "qualified" => LeadStatus::Qualified,
            "discarded" => LeadStatus::Discarded,
            _ => LeadStatus::New,
        }
    }
}

/// A lead captured by an exhibitor scanning a visitor badge.
/// Duplicates per (visitor, exhibitor) are allowed; re-scans track
/// re-engagement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub visitor_id: Uuid,
    pub exhibitor_id: Uuid,
    pub event_id: Uuid,
    pub score: i32,
    pub status: LeadStatus,
    pub notes: Option<String>,
    pub follow_up_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A matchmaking record between two visitors, scored symmetrically
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: Uuid,
    pub user_a: Uuid,
    pub user_b: Uuid,
    pub event_id: Uuid,
    pub score: i32,
    pub created_at: DateTime<Utc>,
}

/// Badge lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum BadgeStatus {
    Pending,
    Printed,
    Reprint,
}

impl BadgeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeStatus::Pending => "pending",
            BadgeStatus::Printed => "printed",
            BadgeStatus::Reprint => "reprint",
        }
    }
}

impl From<&str> for BadgeStatus {
    fn from(s: &str) -> Self {
        match s {
            "printed" => BadgeStatus::Printed,
            "reprint" => BadgeStatus::Reprint,
            _ => BadgeStatus::Pending,
        }
    }
}

/// A badge issued at registration, rendered as a QR code for scanning.
/// A user has at most one active badge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Badge {
    pub id: Uuid,
    pub user_id: Uuid,
    pub qr_payload: String,
    pub category: UserCategory,
    pub status: BadgeStatus,
    pub template: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile attributes consumed by lead/match scoring
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreProfile {
    pub industry: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    pub job_title: Option<String>,
    #[serde(default)]
    pub lead_value: i64,
    #[serde(default)]
    pub networking_goals: Vec<String>,
}
