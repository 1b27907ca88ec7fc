// Scan-to-action resolver
//
// Classifies a decoded payload by the scanner's role (Agent -> check-in
// toggle, Exhibitor -> lead capture, Visitor -> matchmaking) and applies
// the mutation through the ScanStore. Every path converges on the uniform
// ScanOutcome shape; no error escapes `resolve`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Attendee, CheckDirection, ScoreProfile, UserCategory};
use crate::error::{Result, ScanError};
use crate::payload::{self, DecodedScan};
use crate::scoring::{lead_score, match_score};
use crate::traits::ScanStore;

/// Action performed (or attempted) by a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ScanAction {
    Checkin,
    Checkout,
    Lead,
    Match,
    Error,
}

/// Machine-readable failure classification for scan outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ScanErrorKind {
    Camera,
    Format,
    NotFound,
    Backend,
    Timeout,
    UnsupportedRole,
}

impl From<&ScanError> for ScanErrorKind {
    fn from(err: &ScanError) -> Self {
        match err {
            ScanError::Camera(_) => ScanErrorKind::Camera,
            ScanError::PayloadFormat(_) => ScanErrorKind::Format,
            ScanError::NotFound(_) => ScanErrorKind::NotFound,
            ScanError::Backend(_) => ScanErrorKind::Backend,
            ScanError::Timeout => ScanErrorKind::Timeout,
            ScanError::UnsupportedRole(_) => ScanErrorKind::UnsupportedRole,
        }
    }
}

/// Uniform result shape for every scan. Failures carry a kind so the UI
/// can distinguish "fix the badge" from "retry later".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ScanOutcome {
    pub success: bool,
    pub action: ScanAction,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ScanErrorKind>,
}

impl ScanOutcome {
    pub fn succeeded(action: ScanAction, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            success: true,
            action,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(err: &ScanError) -> Self {
        Self {
            success: false,
            action: ScanAction::Error,
            message: err.to_string(),
            data: None,
            error: Some(ScanErrorKind::from(err)),
        }
    }
}

/// A scan request as handed to the resolver. The scanner record is loaded
/// by the caller so the resolver stays lookup-free for its own operator.
#[derive(Debug, Clone)]
pub struct ScanInput {
    pub payload: String,
    pub scanner: Attendee,
    pub event_id: Uuid,
    /// Explicit action override; when absent the scanner's role decides
    pub action_hint: Option<ScanAction>,
}

enum PlannedAction {
    Toggle(Option<CheckDirection>),
    CaptureLead,
    MakeMatch,
}

pub struct ScanResolver<S: ScanStore> {
    store: Arc<S>,
}

impl<S: ScanStore> ScanResolver<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Process one decoded scan. Never returns an error: all failures are
    /// converted into a structured ScanOutcome.
    pub async fn resolve(&self, input: &ScanInput) -> ScanOutcome {
        match self.try_resolve(input).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(scanner = %input.scanner.id, error = %err, "scan failed");
                ScanOutcome::failed(&err)
            }
        }
    }

    async fn try_resolve(&self, input: &ScanInput) -> Result<ScanOutcome> {
        let decoded = payload::decode(&input.payload)?;
        let planned = plan_action(input.scanner.category, input.action_hint)?;
        let target = self.find_target(&decoded).await?;

        match planned {
            PlannedAction::Toggle(forced) => self.toggle(input, &target, forced).await,
            PlannedAction::CaptureLead => self.capture_lead(input, &target).await,
            PlannedAction::MakeMatch => self.make_match(input, &target).await,
        }
    }

    /// Resolve the target record: by badge id, then exact email, then the
    /// alternate login-email field.
    async fn find_target(&self, decoded: &DecodedScan) -> Result<Attendee> {
        let id = &decoded.target_user_id;
        if let Some(attendee) = self.store.attendee_by_external_id(id).await? {
            return Ok(attendee);
        }
        if let Some(attendee) = self.store.attendee_by_email(id).await? {
            return Ok(attendee);
        }
        if let Some(attendee) = self.store.attendee_by_login_email(id).await? {
            return Ok(attendee);
        }
        Err(ScanError::NotFound(id.clone()))
    }

    async fn toggle(
        &self,
        input: &ScanInput,
        target: &Attendee,
        forced: Option<CheckDirection>,
    ) -> Result<ScanOutcome> {
        let applied = self
            .store
            .toggle_check_in(target, input.event_id, input.scanner.id, forced)
            .await?;

        let (action, message) = match applied.record.direction {
            CheckDirection::In => (ScanAction::Checkin, format!("Checked in {}", target.name)),
            CheckDirection::Out => (ScanAction::Checkout, format!("Checked out {}", target.name)),
        };

        let data = serde_json::to_value(&applied).map_err(|e| ScanError::backend(e.to_string()))?;
        Ok(ScanOutcome::succeeded(action, message, data))
    }

    async fn capture_lead(&self, input: &ScanInput, target: &Attendee) -> Result<ScanOutcome> {
        let visitor_profile = self
            .store
            .score_profile(target.id)
            .await?
            .unwrap_or_default();
        let exhibitor_industry = self
            .store
            .score_profile(input.scanner.id)
            .await?
            .and_then(|p: ScoreProfile| p.industry);

        let score = lead_score(&visitor_profile, exhibitor_industry.as_deref());
        let lead = self
            .store
            .create_lead(target, &input.scanner, input.event_id, score)
            .await?;

        let data = serde_json::to_value(&lead).map_err(|e| ScanError::backend(e.to_string()))?;
        Ok(ScanOutcome::succeeded(
            ScanAction::Lead,
            format!("Lead captured: {} (score {score})", target.name),
            data,
        ))
    }

    async fn make_match(&self, input: &ScanInput, target: &Attendee) -> Result<ScanOutcome> {
        let mine = self
            .store
            .score_profile(input.scanner.id)
            .await?
            .unwrap_or_default();
        let theirs = self
            .store
            .score_profile(target.id)
            .await?
            .unwrap_or_default();

        let score = match_score(&mine, &theirs);
        let record = self
            .store
            .create_match(&input.scanner, target, input.event_id, score)
            .await?;

        let data = serde_json::to_value(&record).map_err(|e| ScanError::backend(e.to_string()))?;
        Ok(ScanOutcome::succeeded(
            ScanAction::Match,
            format!("Matched with {} (score {score})", target.name),
            data,
        ))
    }
}

/// Branch by scanner role, letting an explicit hint override
fn plan_action(role: UserCategory, hint: Option<ScanAction>) -> Result<PlannedAction> {
    match hint {
        Some(ScanAction::Checkin) => Ok(PlannedAction::Toggle(Some(CheckDirection::In))),
        Some(ScanAction::Checkout) => Ok(PlannedAction::Toggle(Some(CheckDirection::Out))),
        Some(ScanAction::Lead) => Ok(PlannedAction::CaptureLead),
        Some(ScanAction::Match) => Ok(PlannedAction::MakeMatch),
        Some(ScanAction::Error) | None => match role {
            UserCategory::Agent => Ok(PlannedAction::Toggle(None)),
            UserCategory::Exhibitor => Ok(PlannedAction::CaptureLead),
            UserCategory::Visitor => Ok(PlannedAction::MakeMatch),
            other => Err(ScanError::UnsupportedRole(other)),
        },
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{AppliedCheckIn, CheckInRecord, Lead, LeadStatus, MatchRecord};
    use crate::error::{StoreError, StoreResult};
    use crate::toggle::{latest_for_user, next_direction};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory ScanStore. With `ordered_unsupported` set, the ordered
    /// latest-record query "fails" and the toggle goes through the
    /// client-side sorted fallback, mirroring the missing-index case.
    #[derive(Default)]
    pub struct MemoryStore {
        pub ordered_unsupported: bool,
        pub attendees: Mutex<Vec<Attendee>>,
        pub profiles: Mutex<HashMap<Uuid, ScoreProfile>>,
        pub check_ins: Mutex<Vec<CheckInRecord>>,
        pub leads: Mutex<Vec<Lead>>,
        pub matches: Mutex<Vec<MatchRecord>>,
    }

    impl MemoryStore {
        fn latest_direction(&self, user_id: Uuid, event_id: Uuid) -> StoreResult<Option<CheckDirection>> {
            let records = self.check_ins.lock().unwrap();
            if self.ordered_unsupported {
                // fetch-everything-and-sort-client-side path
                let event_wide: Vec<CheckInRecord> = records
                    .iter()
                    .filter(|r| r.event_id == event_id)
                    .cloned()
                    .collect();
                Ok(latest_for_user(&event_wide, user_id).map(|r| r.direction))
            } else {
                // the ordered/limited query path
                Ok(records
                    .iter()
                    .filter(|r| r.user_id == user_id && r.event_id == event_id)
                    .max_by_key(|r| (r.created_at, r.id))
                    .map(|r| r.direction))
            }
        }
    }

    #[async_trait]
    impl ScanStore for MemoryStore {
        async fn attendee_by_external_id(&self, id: &str) -> StoreResult<Option<Attendee>> {
            Ok(self
                .attendees
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.external_id == id)
                .cloned())
        }

        async fn attendee_by_email(&self, email: &str) -> StoreResult<Option<Attendee>> {
            Ok(self
                .attendees
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.email == email)
                .cloned())
        }

        async fn attendee_by_login_email(&self, email: &str) -> StoreResult<Option<Attendee>> {
            Ok(self
                .attendees
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.login_email.as_deref() == Some(email))
                .cloned())
        }

        async fn toggle_check_in(
            &self,
            target: &Attendee,
            event_id: Uuid,
            agent_id: Uuid,
            forced: Option<CheckDirection>,
        ) -> StoreResult<AppliedCheckIn> {
            let direction = match forced {
                Some(d) => d,
                None => next_direction(self.latest_direction(target.id, event_id)?),
            };
            let record = CheckInRecord {
                id: Uuid::now_v7(),
                user_id: target.id,
                event_id,
                direction,
                agent_id: Some(agent_id),
                created_at: Utc::now(),
            };
            self.check_ins.lock().unwrap().push(record.clone());

            let mut attendees = self.attendees.lock().unwrap();
            let attendee = attendees
                .iter_mut()
                .find(|a| a.id == target.id)
                .ok_or_else(|| StoreError::backend("attendee vanished"))?;
            match direction {
                CheckDirection::In => {
                    attendee.check_in_count += 1;
                    attendee.last_check_in = Some(record.created_at);
                }
                CheckDirection::Out => attendee.last_check_out = Some(record.created_at),
            }
            attendee.last_status = Some(direction);

            Ok(AppliedCheckIn {
                record,
                check_in_count: attendee.check_in_count,
            })
        }

        async fn create_lead(
            &self,
            visitor: &Attendee,
            exhibitor: &Attendee,
            event_id: Uuid,
            score: i32,
        ) -> StoreResult<Lead> {
            let now = Utc::now();
            let lead = Lead {
                id: Uuid::now_v7(),
                visitor_id: visitor.id,
                exhibitor_id: exhibitor.id,
                event_id,
                score,
                status: LeadStatus::New,
                notes: None,
                follow_up_date: None,
                created_at: now,
                updated_at: now,
            };
            self.leads.lock().unwrap().push(lead.clone());
            Ok(lead)
        }

        async fn create_match(
            &self,
            a: &Attendee,
            b: &Attendee,
            event_id: Uuid,
            score: i32,
        ) -> StoreResult<MatchRecord> {
            let record = MatchRecord {
                id: Uuid::now_v7(),
                user_a: a.id,
                user_b: b.id,
                event_id,
                score,
                created_at: Utc::now(),
            };
            self.matches.lock().unwrap().push(record.clone());
            Ok(record)
        }

        async fn score_profile(&self, user_id: Uuid) -> StoreResult<Option<ScoreProfile>> {
            Ok(self.profiles.lock().unwrap().get(&user_id).cloned())
        }
    }

    pub fn attendee(external_id: &str, category: UserCategory) -> Attendee {
        let now = Utc::now();
        Attendee {
            id: Uuid::now_v7(),
            external_id: external_id.to_string(),
            name: format!("{external_id} name"),
            email: format!("{external_id}@example.com"),
            login_email: None,
            category,
            company: None,
            job_title: None,
            phone: None,
            badge_id: None,
            check_in_count: 0,
            last_check_in: None,
            last_check_out: None,
            last_status: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn setup(ordered_unsupported: bool) -> (Arc<MemoryStore>, Attendee, Attendee, Uuid) {
        let store = Arc::new(MemoryStore {
            ordered_unsupported,
            ..Default::default()
        });
        let agent = attendee("agent1", UserCategory::Agent);
        let visitor = attendee("u1x", UserCategory::Visitor);
        store
            .attendees
            .lock()
            .unwrap()
            .extend([agent.clone(), visitor.clone()]);
        (store, agent, visitor, Uuid::now_v7())
    }

    fn input(payload: &str, scanner: &Attendee, event_id: Uuid) -> ScanInput {
        ScanInput {
            payload: payload.to_string(),
            scanner: scanner.clone(),
            event_id,
            action_hint: None,
        }
    }

    #[tokio::test]
    async fn empty_payload_returns_error_outcome_without_throwing() {
        let (store, agent, _, event) = setup(false);
        let resolver = ScanResolver::new(store);
        let outcome = resolver.resolve(&input("", &agent, event)).await;
        assert!(!outcome.success);
        assert_eq!(outcome.action, ScanAction::Error);
        assert_eq!(outcome.error, Some(ScanErrorKind::Format));
    }

    #[tokio::test]
    async fn short_sanitized_id_is_format_not_not_found() {
        let (store, agent, _, event) = setup(false);
        let resolver = ScanResolver::new(store);
        let outcome = resolver.resolve(&input("a!!b", &agent, event)).await;
        assert_eq!(outcome.error, Some(ScanErrorKind::Format));
    }

    #[tokio::test]
    async fn unknown_target_is_not_found_after_all_fallbacks() {
        let (store, agent, _, event) = setup(false);
        let resolver = ScanResolver::new(store);
        let outcome = resolver.resolve(&input("missing_user", &agent, event)).await;
        assert_eq!(outcome.error, Some(ScanErrorKind::NotFound));
    }

    #[tokio::test]
    async fn email_fallback_resolves_target() {
        let (store, agent, visitor, event) = setup(false);
        let resolver = ScanResolver::new(store);
        let outcome = resolver
            .resolve(&input(&visitor.email, &agent, event))
            .await;
        assert!(outcome.success, "{}", outcome.message);
        assert_eq!(outcome.action, ScanAction::Checkin);
    }

    #[tokio::test]
    async fn agent_scans_toggle_between_in_and_out() {
        for fallback in [false, true] {
            let (store, agent, visitor, event) = setup(fallback);
            let resolver = ScanResolver::new(store.clone());
            let payload = format!("{}|Visitor|evt|123", visitor.external_id);

            // never-seen user: first scan checks in
            let first = resolver.resolve(&input(&payload, &agent, event)).await;
            assert!(first.success);
            assert_eq!(first.action, ScanAction::Checkin);
            {
                let records = store.check_ins.lock().unwrap();
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].user_id, visitor.id);
                assert_eq!(records[0].direction, CheckDirection::In);
            }

            // second scan moments later checks out
            let second = resolver.resolve(&input(&payload, &agent, event)).await;
            assert!(second.success);
            assert_eq!(second.action, ScanAction::Checkout);

            // and a third checks back in
            let third = resolver.resolve(&input(&payload, &agent, event)).await;
            assert_eq!(third.action, ScanAction::Checkin);

            let attendees = store.attendees.lock().unwrap();
            let v = attendees.iter().find(|a| a.id == visitor.id).unwrap();
            assert_eq!(v.check_in_count, 2);
            assert_eq!(v.last_status, Some(CheckDirection::In));
        }
    }

    #[tokio::test]
    async fn checkout_hint_overrides_toggle() {
        let (store, agent, visitor, event) = setup(false);
        let resolver = ScanResolver::new(store);
        let mut req = input(&visitor.external_id, &agent, event);
        req.action_hint = Some(ScanAction::Checkout);
        let outcome = resolver.resolve(&req).await;
        assert_eq!(outcome.action, ScanAction::Checkout);
    }

    #[tokio::test]
    async fn exhibitor_scan_captures_scored_lead() {
        let (store, _, visitor, event) = setup(false);
        let exhibitor = attendee("exh1", UserCategory::Exhibitor);
        store.attendees.lock().unwrap().push(exhibitor.clone());
        store.profiles.lock().unwrap().insert(
            visitor.id,
            ScoreProfile {
                industry: Some("Tech".to_string()),
                interests: vec!["ai".to_string()],
                job_title: Some("Director of Ops".to_string()),
                lead_value: 1000,
                networking_goals: vec!["hiring".to_string()],
            },
        );
        store.profiles.lock().unwrap().insert(
            exhibitor.id,
            ScoreProfile {
                industry: Some("tech".to_string()),
                ..Default::default()
            },
        );

        let resolver = ScanResolver::new(store.clone());
        let outcome = resolver
            .resolve(&input(&visitor.external_id, &exhibitor, event))
            .await;
        assert!(outcome.success);
        assert_eq!(outcome.action, ScanAction::Lead);

        let leads = store.leads.lock().unwrap();
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].score, 100);
        assert_eq!(leads[0].visitor_id, visitor.id);
        assert_eq!(leads[0].exhibitor_id, exhibitor.id);
    }

    #[tokio::test]
    async fn visitor_scan_creates_match() {
        let (store, _, visitor, event) = setup(false);
        let other = attendee("vis2", UserCategory::Visitor);
        store.attendees.lock().unwrap().push(other.clone());

        let resolver = ScanResolver::new(store.clone());
        let outcome = resolver
            .resolve(&input(&visitor.external_id, &other, event))
            .await;
        assert!(outcome.success);
        assert_eq!(outcome.action, ScanAction::Match);
        assert_eq!(store.matches.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn organizer_scan_is_unsupported_role() {
        let (store, _, visitor, event) = setup(false);
        let organizer = attendee("org1", UserCategory::Organizer);
        store.attendees.lock().unwrap().push(organizer.clone());

        let resolver = ScanResolver::new(store);
        let outcome = resolver
            .resolve(&input(&visitor.external_id, &organizer, event))
            .await;
        assert!(!outcome.success);
        assert_eq!(outcome.error, Some(ScanErrorKind::UnsupportedRole));
    }

    #[tokio::test]
    async fn legacy_json_payload_resolves_like_compact() {
        let (store, agent, visitor, event) = setup(false);
        let resolver = ScanResolver::new(store);
        let raw = format!(r#"{{"uid":"{}","category":"Visitor"}}"#, visitor.external_id);
        let outcome = resolver.resolve(&input(&raw, &agent, event)).await;
        assert!(outcome.success);
        assert_eq!(outcome.action, ScanAction::Checkin);
    }
}
