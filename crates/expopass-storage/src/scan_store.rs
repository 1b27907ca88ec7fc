// ScanStore implementation backed by the Postgres repository
//
// Lead capture and matchmaking also fan out notifications to the
// affected attendees so the companion app can surface them.

use async_trait::async_trait;
use uuid::Uuid;

use expopass_core::{
    AppliedCheckIn, Attendee, CheckDirection, Lead, MatchRecord, ScanStore, ScoreProfile,
    StoreError, StoreResult,
};

use crate::models::{CheckInRow, ScoreProfileRow, UserRow};
use crate::repositories::Database;

fn backend(err: anyhow::Error) -> StoreError {
    StoreError::backend(err.to_string())
}

#[async_trait]
impl ScanStore for Database {
    async fn attendee_by_external_id(&self, external_id: &str) -> StoreResult<Option<Attendee>> {
        let row = self
            .get_user_by_external_id(external_id)
            .await
            .map_err(backend)?;
        Ok(row.map(UserRow::into_attendee))
    }

    async fn attendee_by_email(&self, email: &str) -> StoreResult<Option<Attendee>> {
        let row = self.get_user_by_email(email).await.map_err(backend)?;
        Ok(row.map(UserRow::into_attendee))
    }

    async fn attendee_by_login_email(&self, email: &str) -> StoreResult<Option<Attendee>> {
        let row = self.get_user_by_login_email(email).await.map_err(backend)?;
        Ok(row.map(UserRow::into_attendee))
    }

    async fn toggle_check_in(
        &self,
        target: &Attendee,
        event_id: Uuid,
        agent_id: Uuid,
        forced: Option<CheckDirection>,
    ) -> StoreResult<AppliedCheckIn> {
        let (row, check_in_count) = Database::toggle_check_in(
            self,
            target.id,
            event_id,
            Some(agent_id),
            forced,
        )
        .await
        .map_err(backend)?;

        Ok(AppliedCheckIn {
            record: CheckInRow::into_record(row),
            check_in_count,
        })
    }

    async fn create_lead(
        &self,
        visitor: &Attendee,
        exhibitor: &Attendee,
        event_id: Uuid,
        score: i32,
    ) -> StoreResult<Lead> {
        let row = Database::create_lead(self, visitor.id, exhibitor.id, event_id, score)
            .await
            .map_err(backend)?;

        let body = format!("New lead: {} ({})", visitor.name, score);
        if let Err(err) = self
            .create_notification(exhibitor.id, "lead.captured", &body)
            .await
        {
            // the lead is already committed, a lost notification is tolerable
            tracing::warn!(%err, lead_id = %row.id, "failed to notify exhibitor");
        }

        Ok(row.into_lead())
    }

    async fn create_match(
        &self,
        a: &Attendee,
        b: &Attendee,
        event_id: Uuid,
        score: i32,
    ) -> StoreResult<MatchRecord> {
        let row = Database::create_match(self, a.id, b.id, event_id, score)
            .await
            .map_err(backend)?;

        for (recipient, other) in [(a, b), (b, a)] {
            let body = format!("You matched with {} ({})", other.name, score);
            if let Err(err) = self
                .create_notification(recipient.id, "match.created", &body)
                .await
            {
                tracing::warn!(%err, match_id = %row.id, "failed to notify match participant");
            }
        }

        Ok(row.into_record())
    }

    async fn score_profile(&self, user_id: Uuid) -> StoreResult<Option<ScoreProfile>> {
        let row = self.get_score_profile(user_id).await.map_err(backend)?;
        Ok(row.map(ScoreProfileRow::into_profile))
    }
}
