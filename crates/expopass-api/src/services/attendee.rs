// Attendee registration and management service
//
// Registration is where the badge pipeline starts: create the user,
// encode the QR payload, issue the pending badge, store scoring
// attributes if the client sent any.

use anyhow::Result;
use rand::Rng;
use std::sync::Arc;
use uuid::Uuid;

use expopass_core::payload::{sanitize_user_id, BadgePayload, MIN_USER_ID_LEN};
use expopass_storage::{
    models::{CreateBadge, CreateUser, UpdateUser, UpsertProfile},
    Database, UserRow,
};

use expopass_contracts::{
    Attendee, Badge, CreateAttendeeRequest, UpdateAttendeeRequest,
};

const EXTERNAL_ID_PREFIX: &str = "usr_";
const EXTERNAL_ID_SUFFIX_LEN: usize = 8;

pub struct AttendeeService {
    db: Arc<Database>,
}

impl AttendeeService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Register an attendee and issue their badge
    pub async fn register(&self, req: CreateAttendeeRequest) -> Result<Attendee> {
        let external_id = resolve_external_id(req.external_id);

        let row = self
            .db
            .create_user(CreateUser {
                external_id,
                name: req.name,
                email: req.email,
                login_email: req.login_email,
                category: req.category,
                company: req.company,
                job_title: req.job_title.clone(),
                phone: req.phone,
            })
            .await?;

        // event id on the badge is whatever is active at registration time
        let settings = self.db.get_app_settings().await?;
        let event_id = settings
            .event_id
            .map(|id| id.to_string())
            .unwrap_or_default();

        let payload = BadgePayload::new(
            row.external_id.clone(),
            row.category.clone(),
            event_id,
        )
        .encode();

        let badge = self
            .db
            .issue_badge(CreateBadge {
                user_id: row.id,
                qr_payload: payload,
                category: expopass_core::UserCategory::from(row.category.as_str()),
                template: None,
            })
            .await?;

        if let Some(profile) = req.profile {
            self.db
                .upsert_profile(
                    row.id,
                    UpsertProfile {
                        industry: profile.industry,
                        interests: profile.interests,
                        lead_value: profile.lead_value,
                        networking_goals: profile.networking_goals,
                    },
                )
                .await?;
        }

        // re-read to pick up the badge back-reference
        let row = self
            .db
            .get_user(row.id)
            .await?
            .unwrap_or_else(|| refresh_fallback(row, badge.id));

        Ok(Self::row_to_attendee(row))
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Attendee>> {
        let row = self.db.get_user(id).await?;
        Ok(row.map(Self::row_to_attendee))
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<Attendee>> {
        let row = self.db.get_user_by_email(email).await?;
        Ok(row.map(Self::row_to_attendee))
    }

    pub async fn list(&self) -> Result<Vec<Attendee>> {
        let rows = self.db.list_users().await?;
        Ok(rows.into_iter().map(Self::row_to_attendee).collect())
    }

    pub async fn update(&self, id: Uuid, req: UpdateAttendeeRequest) -> Result<Option<Attendee>> {
        let row = self
            .db
            .update_user(
                id,
                UpdateUser {
                    name: req.name,
                    email: req.email,
                    login_email: req.login_email,
                    category: req.category,
                    company: req.company,
                    job_title: req.job_title,
                    phone: req.phone,
                },
            )
            .await?;

        let Some(row) = row else { return Ok(None) };

        if let Some(profile) = req.profile {
            self.db
                .upsert_profile(
                    id,
                    UpsertProfile {
                        industry: profile.industry,
                        interests: profile.interests,
                        lead_value: profile.lead_value,
                        networking_goals: profile.networking_goals,
                    },
                )
                .await?;
        }

        Ok(Some(Self::row_to_attendee(row)))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        self.db.delete_user(id).await
    }

    /// Re-encode and re-issue the badge for an existing attendee
    pub async fn reissue_badge(&self, user_id: Uuid) -> Result<Option<Badge>> {
        let Some(row) = self.db.get_user(user_id).await? else {
            return Ok(None);
        };

        let settings = self.db.get_app_settings().await?;
        let event_id = settings
            .event_id
            .map(|id| id.to_string())
            .unwrap_or_default();

        let payload =
            BadgePayload::new(row.external_id, row.category.clone(), event_id).encode();

        let badge = self
            .db
            .issue_badge(CreateBadge {
                user_id,
                qr_payload: payload,
                category: expopass_core::UserCategory::from(row.category.as_str()),
                template: None,
            })
            .await?;

        Ok(Some(crate::badges::row_to_badge(badge)))
    }

    pub(crate) fn row_to_attendee(row: UserRow) -> Attendee {
        let a = row.into_attendee();
        Attendee {
            id: a.id,
            external_id: a.external_id,
            name: a.name,
            email: a.email,
            login_email: a.login_email,
            category: a.category,
            company: a.company,
            job_title: a.job_title,
            phone: a.phone,
            badge_id: a.badge_id,
            check_in_count: a.check_in_count,
            last_check_in: a.last_check_in,
            last_check_out: a.last_check_out,
            last_status: a.last_status,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

/// Keep a requested external id only if it still meets the badge codec
/// minimum after sanitization; a shorter remnant would encode into a
/// payload that can never scan.
fn resolve_external_id(requested: Option<String>) -> String {
    match requested {
        Some(raw) => {
            let cleaned = sanitize_user_id(&raw);
            if cleaned.len() >= MIN_USER_ID_LEN {
                cleaned
            } else {
                tracing::warn!(
                    requested = %raw,
                    "requested external id unusable after sanitization, generating one"
                );
                generate_external_id()
            }
        }
        None => generate_external_id(),
    }
}

fn generate_external_id() -> String {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..EXTERNAL_ID_SUFFIX_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("{EXTERNAL_ID_PREFIX}{suffix}")
}

fn refresh_fallback(mut row: UserRow, badge_id: Uuid) -> UserRow {
    row.badge_id = Some(badge_id);
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requested_external_id_survives_sanitization() {
        assert_eq!(resolve_external_id(Some("a!b-c".into())), "ab-c");
    }

    #[test]
    fn too_short_after_sanitization_gets_generated_id() {
        // "a!b" cleans to "ab", below the codec minimum
        let id = resolve_external_id(Some("a!b".into()));
        assert!(id.starts_with(EXTERNAL_ID_PREFIX));
        assert_eq!(id.len(), EXTERNAL_ID_PREFIX.len() + EXTERNAL_ID_SUFFIX_LEN);
    }

    #[test]
    fn all_symbol_id_gets_generated_id() {
        let id = resolve_external_id(Some("!!!".into()));
        assert!(id.starts_with(EXTERNAL_ID_PREFIX));
    }

    #[test]
    fn missing_external_id_gets_generated_id() {
        let id = resolve_external_id(None);
        assert!(id.starts_with(EXTERNAL_ID_PREFIX));
        assert_eq!(id.len(), EXTERNAL_ID_PREFIX.len() + EXTERNAL_ID_SUFFIX_LEN);
    }
}
