// Core domain logic for ExpoPass
//
// This crate is DB-agnostic: storage access goes through the ScanStore
// trait, and the scan session reads frames through FrameSource/QrDetector
// so the same pipeline runs against a camera, a file, or a test script.

pub mod config;
pub mod domain;
pub mod error;
pub mod payload;
pub mod resolver;
pub mod scanner;
pub mod scoring;
pub mod toggle;
pub mod traits;

pub use config::{AppSettings, ScanLoopConfig};
pub use domain::{
    AppliedCheckIn, Attendee, Badge, BadgeStatus, CheckDirection, CheckInRecord, Lead, LeadStatus,
    MatchRecord, ScoreProfile, UserCategory,
};
pub use error::{CameraError, Result, ScanError, StoreError, StoreResult};
pub use payload::{decode, sanitize_user_id, BadgePayload, DecodedScan, PayloadFormat};
pub use resolver::{ScanAction, ScanErrorKind, ScanInput, ScanOutcome, ScanResolver};
pub use scanner::{
    CameraConstraint, CancelFlag, Frame, FrameSource, QrDetector, Region, ScanPhase, ScanSession,
    ScanSessionEnd,
};
pub use scoring::{lead_score, match_score};
pub use toggle::{latest_for_user, next_direction};
pub use traits::ScanStore;
