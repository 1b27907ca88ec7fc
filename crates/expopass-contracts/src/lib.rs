// Public API DTOs for ExpoPass
//
// These are the wire shapes served by expopass-api. Domain enums
// (UserCategory, CheckDirection, BadgeStatus, LeadStatus, ScanAction)
// are re-exported from core so the API and clients share one definition.

pub mod attendee;
pub mod badge;
pub mod checkin;
pub mod common;
pub mod lead;
pub mod matchmaking;
pub mod notification;
pub mod scan;
pub mod settings;
pub mod stats;

pub use attendee::{Attendee, CreateAttendeeRequest, UpdateAttendeeRequest};
pub use badge::{Badge, BulkBadgeStatusRequest};
pub use checkin::CheckIn;
pub use common::ListResponse;
pub use lead::{Lead, UpdateLeadRequest};
pub use matchmaking::{MatchRecord, RecommendRequest, Recommendation};
pub use notification::Notification;
pub use scan::ScanRequest;
pub use settings::{AppSettings, UpdateSettingsRequest};
pub use stats::DailyStat;

pub use expopass_core::{
    BadgeStatus, CheckDirection, LeadStatus, ScanAction, ScanErrorKind, ScanOutcome, UserCategory,
};
