// Repository layer for database operations

use anyhow::Result;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use expopass_core::toggle::{latest_for_user, next_direction};
use expopass_core::{CheckDirection, CheckInRecord};

use crate::models::*;

/// Which daily counter a mutation bumps
#[derive(Debug, Clone, Copy)]
pub(crate) enum StatField {
    CheckIns,
    CheckOuts,
    Leads,
    Matches,
}

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    /// Run pending migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user(&self, input: CreateUser) -> Result<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, external_id, name, email, login_email, category, company, job_title, phone)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.external_id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.login_email)
        .bind(input.category.as_str())
        .bind(&input.company)
        .bind(&input.job_title)
        .bind(&input.phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn get_user_by_external_id(&self, external_id: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE external_id = $1")
            .bind(external_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn get_user_by_login_email(&self, email: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE login_email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn list_users(&self) -> Result<Vec<UserRow>> {
        let rows = sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn update_user(&self, id: Uuid, input: UpdateUser) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                login_email = COALESCE($4, login_email),
                category = COALESCE($5, category),
                company = COALESCE($6, company),
                job_title = COALESCE($7, job_title),
                phone = COALESCE($8, phone),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.login_email)
        .bind(input.category.map(|c| c.as_str()))
        .bind(&input.company)
        .bind(&input.job_title)
        .bind(&input.phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Badges (one active badge per user)
    // ============================================

    /// Issue a badge for a user. Re-issuing replaces the payload on the
    /// existing badge and resets it to pending; the user's back-reference
    /// is set in the same transaction.
    pub async fn issue_badge(&self, input: CreateBadge) -> Result<BadgeRow> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, BadgeRow>(
            r#"
            INSERT INTO badges (id, user_id, qr_payload, category, status, template)
            VALUES ($1, $2, $3, $4, 'pending', $5)
            ON CONFLICT (user_id) DO UPDATE SET
                qr_payload = EXCLUDED.qr_payload,
                category = EXCLUDED.category,
                status = 'pending',
                template = COALESCE(EXCLUDED.template, badges.template),
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(input.user_id)
        .bind(&input.qr_payload)
        .bind(input.category.as_str())
        .bind(&input.template)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE users SET badge_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(input.user_id)
            .bind(row.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row)
    }

    pub async fn get_badge(&self, id: Uuid) -> Result<Option<BadgeRow>> {
        let row = sqlx::query_as::<_, BadgeRow>("SELECT * FROM badges WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Delete a badge and clear the user's back-reference atomically
    pub async fn delete_badge(&self, id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let user_id: Option<Uuid> =
            sqlx::query_scalar("DELETE FROM badges WHERE id = $1 RETURNING user_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(user_id) = user_id else {
            return Ok(false);
        };

        sqlx::query("UPDATE users SET badge_id = NULL, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    pub async fn set_badge_status(
        &self,
        id: Uuid,
        status: expopass_core::BadgeStatus,
    ) -> Result<Option<BadgeRow>> {
        let row = sqlx::query_as::<_, BadgeRow>(
            "UPDATE badges SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn bulk_set_badge_status(
        &self,
        ids: &[Uuid],
        status: expopass_core::BadgeStatus,
    ) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE badges SET status = $2, updated_at = NOW() WHERE id = ANY($1)",
        )
        .bind(ids)
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    // ============================================
    // Check-ins
    // ============================================

    /// Append a check-in/checkout record and update the user summary in
    /// one transaction. The user row is locked first so two concurrent
    /// scans of the same badge serialize and alternate directions instead
    /// of both reading the same "latest" record.
    pub async fn toggle_check_in(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        agent_id: Option<Uuid>,
        forced: Option<CheckDirection>,
    ) -> Result<(CheckInRow, i32)> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let latest = match Self::latest_direction(&mut tx, user_id, event_id).await {
            Ok(latest) => latest,
            Err(err) => {
                // same decision rule over an unordered event-wide fetch
                tracing::warn!(%err, "ordered check-in query failed, sorting client-side");
                Self::latest_direction_fallback(&mut tx, user_id, event_id).await?
            }
        };
        let direction = forced.unwrap_or_else(|| next_direction(latest));

        let row = sqlx::query_as::<_, CheckInRow>(
            r#"
            INSERT INTO check_ins (id, user_id, event_id, direction, agent_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(event_id)
        .bind(direction.as_str())
        .bind(agent_id)
        .fetch_one(&mut *tx)
        .await?;

        let count: i32 = match direction {
            CheckDirection::In => {
                sqlx::query_scalar(
                    r#"
                    UPDATE users
                    SET check_in_count = check_in_count + 1,
                        last_check_in = $2,
                        last_status = 'in',
                        updated_at = NOW()
                    WHERE id = $1
                    RETURNING check_in_count
                    "#,
                )
                .bind(user_id)
                .bind(row.created_at)
                .fetch_one(&mut *tx)
                .await?
            }
            CheckDirection::Out => {
                sqlx::query_scalar(
                    r#"
                    UPDATE users
                    SET last_check_out = $2,
                        last_status = 'out',
                        updated_at = NOW()
                    WHERE id = $1
                    RETURNING check_in_count
                    "#,
                )
                .bind(user_id)
                .bind(row.created_at)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        let field = match direction {
            CheckDirection::In => StatField::CheckIns,
            CheckDirection::Out => StatField::CheckOuts,
        };
        Self::bump_daily_stat(&mut tx, event_id, field).await?;

        tx.commit().await?;
        Ok((row, count))
    }

    /// The ordered/limited query path (relies on the composite index)
    async fn latest_direction(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<CheckDirection>> {
        let direction: Option<String> = sqlx::query_scalar(
            r#"
            SELECT direction FROM check_ins
            WHERE user_id = $1 AND event_id = $2
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(direction.as_deref().map(CheckDirection::from))
    }

    /// Fallback: fetch every record for the event unordered and pick the
    /// latest client-side. Must decide identically to the ordered path.
    async fn latest_direction_fallback(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<CheckDirection>> {
        let rows = sqlx::query_as::<_, CheckInRow>("SELECT * FROM check_ins WHERE event_id = $1")
            .bind(event_id)
            .fetch_all(&mut **tx)
            .await?;

        let records: Vec<CheckInRecord> = rows.into_iter().map(CheckInRow::into_record).collect();
        Ok(latest_for_user(&records, user_id).map(|r| r.direction))
    }

    /// List check-ins for an event, ordered by the time-ordered id.
    /// `since_id` resumes after a previously seen record (SSE cursor).
    pub async fn list_check_ins_for_event(
        &self,
        event_id: Uuid,
        since_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<CheckInRow>> {
        let rows = if let Some(since) = since_id {
            sqlx::query_as::<_, CheckInRow>(
                r#"
                SELECT * FROM check_ins
                WHERE event_id = $1 AND id > $2
                ORDER BY id ASC
                LIMIT $3
                "#,
            )
            .bind(event_id)
            .bind(since)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, CheckInRow>(
                r#"
                SELECT * FROM check_ins
                WHERE event_id = $1
                ORDER BY id ASC
                LIMIT $2
                "#,
            )
            .bind(event_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
        };

        Ok(rows)
    }

    pub async fn list_check_ins_for_user(&self, user_id: Uuid) -> Result<Vec<CheckInRow>> {
        let rows = sqlx::query_as::<_, CheckInRow>(
            "SELECT * FROM check_ins WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ============================================
    // Leads
    // ============================================

    pub async fn create_lead(
        &self,
        visitor_id: Uuid,
        exhibitor_id: Uuid,
        event_id: Uuid,
        score: i32,
    ) -> Result<LeadRow> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, LeadRow>(
            r#"
            INSERT INTO leads (id, visitor_id, exhibitor_id, event_id, score, status)
            VALUES ($1, $2, $3, $4, $5, 'new')
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(visitor_id)
        .bind(exhibitor_id)
        .bind(event_id)
        .bind(score)
        .fetch_one(&mut *tx)
        .await?;

        Self::bump_daily_stat(&mut tx, event_id, StatField::Leads).await?;

        tx.commit().await?;
        Ok(row)
    }

    pub async fn get_lead(&self, id: Uuid) -> Result<Option<LeadRow>> {
        let row = sqlx::query_as::<_, LeadRow>("SELECT * FROM leads WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Newest first so the latest re-scan of a visitor tops the list
    pub async fn list_leads_for_exhibitor(&self, exhibitor_id: Uuid) -> Result<Vec<LeadRow>> {
        let rows = sqlx::query_as::<_, LeadRow>(
            "SELECT * FROM leads WHERE exhibitor_id = $1 ORDER BY created_at DESC",
        )
        .bind(exhibitor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn update_lead(&self, id: Uuid, input: UpdateLead) -> Result<Option<LeadRow>> {
        let row = sqlx::query_as::<_, LeadRow>(
            r#"
            UPDATE leads
            SET
                status = COALESCE($2, status),
                notes = COALESCE($3, notes),
                follow_up_date = COALESCE($4, follow_up_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.status.map(|s| s.as_str()))
        .bind(&input.notes)
        .bind(input.follow_up_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    // ============================================
    // Matches
    // ============================================

    pub async fn create_match(
        &self,
        user_a: Uuid,
        user_b: Uuid,
        event_id: Uuid,
        score: i32,
    ) -> Result<MatchRow> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, MatchRow>(
            r#"
            INSERT INTO matches (id, user_a, user_b, event_id, score)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(user_a)
        .bind(user_b)
        .bind(event_id)
        .bind(score)
        .fetch_one(&mut *tx)
        .await?;

        Self::bump_daily_stat(&mut tx, event_id, StatField::Matches).await?;

        tx.commit().await?;
        Ok(row)
    }

    pub async fn list_matches_for_user(&self, user_id: Uuid) -> Result<Vec<MatchRow>> {
        let rows = sqlx::query_as::<_, MatchRow>(
            r#"
            SELECT * FROM matches
            WHERE user_a = $1 OR user_b = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ============================================
    // Scoring profiles
    // ============================================

    pub async fn upsert_profile(&self, user_id: Uuid, input: UpsertProfile) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO attendee_profiles (user_id, industry, interests, lead_value, networking_goals)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE SET
                industry = EXCLUDED.industry,
                interests = EXCLUDED.interests,
                lead_value = EXCLUDED.lead_value,
                networking_goals = EXCLUDED.networking_goals,
                updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(&input.industry)
        .bind(&input.interests)
        .bind(input.lead_value)
        .bind(&input.networking_goals)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Scoring attributes joined with the user's job title
    pub async fn get_score_profile(&self, user_id: Uuid) -> Result<Option<ScoreProfileRow>> {
        let row = sqlx::query_as::<_, ScoreProfileRow>(
            r#"
            SELECT p.industry, p.interests, p.lead_value, p.networking_goals, u.job_title
            FROM attendee_profiles p
            JOIN users u ON u.id = p.user_id
            WHERE p.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Matchmaking candidates: every other visitor/exhibitor with their
    /// profile attributes left-joined
    pub async fn list_candidates(&self, exclude: Uuid, limit: i64) -> Result<Vec<CandidateRow>> {
        let rows = sqlx::query_as::<_, CandidateRow>(
            r#"
            SELECT u.id, u.name, u.company, u.job_title, u.category,
                   p.industry, p.interests, p.lead_value, p.networking_goals
            FROM users u
            LEFT JOIN attendee_profiles p ON p.user_id = u.id
            WHERE u.id <> $1 AND u.category IN ('visitor', 'exhibitor')
            ORDER BY u.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(exclude)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ============================================
    // Notifications
    // ============================================

    pub async fn create_notification(
        &self,
        user_id: Uuid,
        kind: &str,
        body: &str,
    ) -> Result<NotificationRow> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            INSERT INTO notifications (id, user_id, kind, body)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(kind)
        .bind(body)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_notifications_for_user(&self, user_id: Uuid) -> Result<Vec<NotificationRow>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            "SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn mark_notification_read(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Daily event stats
    // ============================================

    async fn bump_daily_stat(
        tx: &mut Transaction<'_, Postgres>,
        event_id: Uuid,
        field: StatField,
    ) -> Result<()> {
        let sql = match field {
            StatField::CheckIns => {
                r#"
                INSERT INTO daily_event_stats (event_id, day, check_ins) VALUES ($1, CURRENT_DATE, 1)
                ON CONFLICT (event_id, day) DO UPDATE SET check_ins = daily_event_stats.check_ins + 1
                "#
            }
            StatField::CheckOuts => {
                r#"
                INSERT INTO daily_event_stats (event_id, day, check_outs) VALUES ($1, CURRENT_DATE, 1)
                ON CONFLICT (event_id, day) DO UPDATE SET check_outs = daily_event_stats.check_outs + 1
                "#
            }
            StatField::Leads => {
                r#"
                INSERT INTO daily_event_stats (event_id, day, leads) VALUES ($1, CURRENT_DATE, 1)
                ON CONFLICT (event_id, day) DO UPDATE SET leads = daily_event_stats.leads + 1
                "#
            }
            StatField::Matches => {
                r#"
                INSERT INTO daily_event_stats (event_id, day, matches) VALUES ($1, CURRENT_DATE, 1)
                ON CONFLICT (event_id, day) DO UPDATE SET matches = daily_event_stats.matches + 1
                "#
            }
        };

        sqlx::query(sql).bind(event_id).execute(&mut **tx).await?;
        Ok(())
    }

    pub async fn list_daily_stats(&self, event_id: Uuid) -> Result<Vec<DailyStatRow>> {
        let rows = sqlx::query_as::<_, DailyStatRow>(
            "SELECT * FROM daily_event_stats WHERE event_id = $1 ORDER BY day ASC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, input: CreateEvent) -> Result<EventRow> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            INSERT INTO events (id, name, starts_at, ends_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.name)
        .bind(input.starts_at)
        .bind(input.ends_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn list_events(&self) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>("SELECT * FROM events ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    // ============================================
    // App settings (single global row)
    // ============================================

    pub async fn get_app_settings(&self) -> Result<AppSettingsRow> {
        let row = sqlx::query_as::<_, AppSettingsRow>(
            "SELECT event_id, app_name, logo_url FROM app_settings WHERE id = 1",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn update_app_settings(&self, input: UpdateAppSettings) -> Result<AppSettingsRow> {
        let row = sqlx::query_as::<_, AppSettingsRow>(
            r#"
            UPDATE app_settings
            SET
                event_id = COALESCE($1, event_id),
                app_name = COALESCE($2, app_name),
                logo_url = COALESCE($3, logo_url),
                updated_at = NOW()
            WHERE id = 1
            RETURNING event_id, app_name, logo_url
            "#,
        )
        .bind(input.event_id)
        .bind(&input.app_name)
        .bind(&input.logo_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}
