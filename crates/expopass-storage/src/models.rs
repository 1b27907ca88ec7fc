// Database models (internal, may differ from public DTOs)
//
// Rows are converted into typed core entities at this boundary; string
// enums from the wire-era schema go through the core From<&str> parsers
// instead of propagating untyped values upward.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use expopass_core::{
    Attendee, Badge, BadgeStatus, CheckDirection, CheckInRecord, Lead, LeadStatus, MatchRecord,
    ScoreProfile, UserCategory,
};

// ============================================
// User models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub external_id: String,
    pub name: String,
    pub email: String,
    pub login_email: Option<String>,
    pub category: String,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub phone: Option<String>,
    pub badge_id: Option<Uuid>,
    pub check_in_count: i32,
    pub last_check_in: Option<DateTime<Utc>>,
    pub last_check_out: Option<DateTime<Utc>>,
    pub last_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub fn into_attendee(self) -> Attendee {
        Attendee {
            id: self.id,
            external_id: self.external_id,
            name: self.name,
            email: self.email,
            login_email: self.login_email,
            category: UserCategory::from(self.category.as_str()),
            company: self.company,
            job_title: self.job_title,
            phone: self.phone,
            badge_id: self.badge_id,
            check_in_count: self.check_in_count,
            last_check_in: self.last_check_in,
            last_check_out: self.last_check_out,
            last_status: self.last_status.as_deref().map(CheckDirection::from),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub external_id: String,
    pub name: String,
    pub email: String,
    pub login_email: Option<String>,
    pub category: UserCategory,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_email: Option<String>,
    pub category: Option<UserCategory>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub phone: Option<String>,
}

// ============================================
// Badge models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct BadgeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub qr_payload: String,
    pub category: String,
    pub status: String,
    pub template: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BadgeRow {
    pub fn into_badge(self) -> Badge {
        Badge {
            id: self.id,
            user_id: self.user_id,
            qr_payload: self.qr_payload,
            category: UserCategory::from(self.category.as_str()),
            status: BadgeStatus::from(self.status.as_str()),
            template: self.template,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateBadge {
    pub user_id: Uuid,
    pub qr_payload: String,
    pub category: UserCategory,
    pub template: Option<String>,
}

// ============================================
// Check-in models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct CheckInRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub direction: String,
    pub agent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl CheckInRow {
    pub fn into_record(self) -> CheckInRecord {
        CheckInRecord {
            id: self.id,
            user_id: self.user_id,
            event_id: self.event_id,
            direction: CheckDirection::from(self.direction.as_str()),
            agent_id: self.agent_id,
            created_at: self.created_at,
        }
    }
}

// ============================================
// Lead / match models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct LeadRow {
    pub id: Uuid,
    pub visitor_id: Uuid,
    pub exhibitor_id: Uuid,
    pub event_id: Uuid,
    pub score: i32,
    pub status: String,
    pub notes: Option<String>,
    pub follow_up_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LeadRow {
    pub fn into_lead(self) -> Lead {
        Lead {
            id: self.id,
            visitor_id: self.visitor_id,
            exhibitor_id: self.exhibitor_id,
            event_id: self.event_id,
            score: self.score,
            status: LeadStatus::from(self.status.as_str()),
            notes: self.notes,
            follow_up_date: self.follow_up_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateLead {
    pub status: Option<LeadStatus>,
    pub notes: Option<String>,
    pub follow_up_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, FromRow)]
pub struct MatchRow {
    pub id: Uuid,
    pub user_a: Uuid,
    pub user_b: Uuid,
    pub event_id: Uuid,
    pub score: i32,
    pub created_at: DateTime<Utc>,
}

impl MatchRow {
    pub fn into_record(self) -> MatchRecord {
        MatchRecord {
            id: self.id,
            user_a: self.user_a,
            user_b: self.user_b,
            event_id: self.event_id,
            score: self.score,
            created_at: self.created_at,
        }
    }
}

// ============================================
// Profile / notification / stats models
// ============================================

#[derive(Debug, Clone, Default)]
pub struct UpsertProfile {
    pub industry: Option<String>,
    pub interests: Vec<String>,
    pub lead_value: i64,
    pub networking_goals: Vec<String>,
}

/// Scoring attributes joined with the user's job title
#[derive(Debug, Clone, FromRow)]
pub struct ScoreProfileRow {
    pub industry: Option<String>,
    pub interests: Vec<String>,
    pub lead_value: i64,
    pub networking_goals: Vec<String>,
    pub job_title: Option<String>,
}

impl ScoreProfileRow {
    pub fn into_profile(self) -> ScoreProfile {
        ScoreProfile {
            industry: self.industry,
            interests: self.interests,
            job_title: self.job_title,
            lead_value: self.lead_value,
            networking_goals: self.networking_goals,
        }
    }
}

/// A matchmaking candidate: user fields plus optional profile (LEFT JOIN)
#[derive(Debug, Clone, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub name: String,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub category: String,
    pub industry: Option<String>,
    pub interests: Option<Vec<String>>,
    pub lead_value: Option<i64>,
    pub networking_goals: Option<Vec<String>>,
}

impl CandidateRow {
    pub fn profile(&self) -> ScoreProfile {
        ScoreProfile {
            industry: self.industry.clone(),
            interests: self.interests.clone().unwrap_or_default(),
            job_title: self.job_title.clone(),
            lead_value: self.lead_value.unwrap_or(0),
            networking_goals: self.networking_goals.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct NotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub body: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DailyStatRow {
    pub event_id: Uuid,
    pub day: NaiveDate,
    pub check_ins: i64,
    pub check_outs: i64,
    pub leads: i64,
    pub matches: i64,
}

// ============================================
// Event / settings models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub name: String,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub name: String,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, FromRow)]
pub struct AppSettingsRow {
    pub event_id: Option<Uuid>,
    pub app_name: String,
    pub logo_url: Option<String>,
}

impl AppSettingsRow {
    pub fn into_settings(self) -> expopass_core::AppSettings {
        expopass_core::AppSettings {
            event_id: self.event_id,
            app_name: self.app_name,
            logo_url: self.logo_url,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateAppSettings {
    pub event_id: Option<Uuid>,
    pub app_name: Option<String>,
    pub logo_url: Option<String>,
}
