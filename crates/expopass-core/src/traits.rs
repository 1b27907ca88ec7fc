// Store trait at the seam between the resolver and persistence
//
// Implemented by the Postgres layer in expopass-storage and by an
// in-memory store in tests.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    AppliedCheckIn, Attendee, CheckDirection, Lead, MatchRecord, ScoreProfile,
};
use crate::error::StoreResult;

/// Everything the scan resolver needs from persistence
#[async_trait]
pub trait ScanStore: Send + Sync {
    /// Look up an attendee by the badge-facing external id
    async fn attendee_by_external_id(&self, external_id: &str) -> StoreResult<Option<Attendee>>;

    /// Secondary lookup by exact-match email
    async fn attendee_by_email(&self, email: &str) -> StoreResult<Option<Attendee>>;

    /// Tertiary lookup by the alternate login-email field
    async fn attendee_by_login_email(&self, email: &str) -> StoreResult<Option<Attendee>>;

    /// Append a check-in/checkout record and update the user summary.
    /// The implementation decides the direction from the latest logged
    /// record (or `forced` when given) and must apply read + append +
    /// summary update atomically.
    async fn toggle_check_in(
        &self,
        target: &Attendee,
        event_id: Uuid,
        agent_id: Uuid,
        forced: Option<CheckDirection>,
    ) -> StoreResult<AppliedCheckIn>;

    /// Record a lead captured by `exhibitor` scanning `visitor`
    async fn create_lead(
        &self,
        visitor: &Attendee,
        exhibitor: &Attendee,
        event_id: Uuid,
        score: i32,
    ) -> StoreResult<Lead>;

    /// Record a symmetric match between two attendees
    async fn create_match(
        &self,
        a: &Attendee,
        b: &Attendee,
        event_id: Uuid,
        score: i32,
    ) -> StoreResult<MatchRecord>;

    /// Scoring attributes for a user, if a profile exists
    async fn score_profile(&self, user_id: Uuid) -> StoreResult<Option<ScoreProfile>>;
}
