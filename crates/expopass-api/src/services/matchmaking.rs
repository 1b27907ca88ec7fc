// Matchmaking recommendation service
//
// Scores the requesting attendee against every candidate with a profile
// using the symmetric match score and returns the top results.

use anyhow::{anyhow, Result};
use std::sync::Arc;
use uuid::Uuid;

use expopass_core::scoring::match_score;
use expopass_storage::Database;

use expopass_contracts::Recommendation;

const DEFAULT_LIMIT: i64 = 10;
const CANDIDATE_POOL: i64 = 500;

pub struct MatchmakingService {
    db: Arc<Database>,
}

impl MatchmakingService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn recommend(&self, user_id: Uuid, limit: Option<i64>) -> Result<Vec<Recommendation>> {
        let profile = self
            .db
            .get_score_profile(user_id)
            .await?
            .ok_or_else(|| anyhow!("no scoring profile for user {user_id}"))?
            .into_profile();

        let candidates = self.db.list_candidates(user_id, CANDIDATE_POOL).await?;

        let mut scored: Vec<Recommendation> = candidates
            .into_iter()
            .map(|c| {
                let score = match_score(&profile, &c.profile());
                Recommendation {
                    user_id: c.id,
                    name: c.name,
                    company: c.company,
                    job_title: c.job_title,
                    score,
                }
            })
            .filter(|r| r.score > 0)
            .collect();

        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(limit.unwrap_or(DEFAULT_LIMIT).max(0) as usize);

        Ok(scored)
    }
}
