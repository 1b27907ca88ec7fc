// Lead and match scoring
//
// A deterministic weighted sum, 0-100. The weights are part of the
// external contract: exhibitors sort their lead lists by these numbers,
// so changing them silently would reshuffle every dashboard.

use crate::domain::ScoreProfile;

pub const INDUSTRY_MATCH: i32 = 30;
pub const INTERESTS_PRESENT: i32 = 25;
pub const SENIORITY_SIGNAL: i32 = 20;
pub const LEAD_VALUE: i32 = 15;
pub const NETWORKING_GOALS: i32 = 10;
pub const MAX_SCORE: i32 = 100;

const SENIORITY_KEYWORDS: [&str; 3] = ["manager", "director", "ceo"];

/// Score a visitor profile against an exhibitor's industry
pub fn lead_score(visitor: &ScoreProfile, exhibitor_industry: Option<&str>) -> i32 {
    let mut score = 0;

    if let (Some(v), Some(e)) = (visitor.industry.as_deref(), exhibitor_industry) {
        if !v.trim().is_empty() && v.trim().eq_ignore_ascii_case(e.trim()) {
            score += INDUSTRY_MATCH;
        }
    }

    if !visitor.interests.is_empty() {
        score += INTERESTS_PRESENT;
    }

    if let Some(title) = visitor.job_title.as_deref() {
        let title = title.to_ascii_lowercase();
        if SENIORITY_KEYWORDS.iter().any(|k| title.contains(k)) {
            score += SENIORITY_SIGNAL;
        }
    }

    if visitor.lead_value != 0 {
        score += LEAD_VALUE;
    }

    if !visitor.networking_goals.is_empty() {
        score += NETWORKING_GOALS;
    }

    score.min(MAX_SCORE)
}

/// Symmetric match score between two attendees: the better of the two
/// directed scores.
pub fn match_score(a: &ScoreProfile, b: &ScoreProfile) -> i32 {
    lead_score(a, b.industry.as_deref()).max(lead_score(b, a.industry.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_profile() -> ScoreProfile {
        ScoreProfile {
            industry: Some("Technology".to_string()),
            interests: vec!["cloud".to_string()],
            job_title: Some("Sales Director".to_string()),
            lead_value: 50_000,
            networking_goals: vec!["partnerships".to_string()],
        }
    }

    #[test]
    fn all_signals_score_exactly_100() {
        let score = lead_score(&full_profile(), Some("technology"));
        assert_eq!(score, 30 + 25 + 20 + 15 + 10);
        assert_eq!(score, MAX_SCORE);
    }

    #[test]
    fn no_signals_score_zero() {
        assert_eq!(lead_score(&ScoreProfile::default(), Some("Technology")), 0);
    }

    #[test]
    fn industry_mismatch_loses_30() {
        assert_eq!(lead_score(&full_profile(), Some("Finance")), 70);
        assert_eq!(lead_score(&full_profile(), None), 70);
    }

    #[test]
    fn seniority_is_substring_case_insensitive() {
        let mut p = ScoreProfile::default();
        p.job_title = Some("CEO & Founder".to_string());
        assert_eq!(lead_score(&p, None), SENIORITY_SIGNAL);

        p.job_title = Some("Engineering MANAGER".to_string());
        assert_eq!(lead_score(&p, None), SENIORITY_SIGNAL);

        p.job_title = Some("Engineer".to_string());
        assert_eq!(lead_score(&p, None), 0);
    }

    #[test]
    fn match_score_is_symmetric() {
        let a = full_profile();
        let b = ScoreProfile {
            industry: Some("Technology".to_string()),
            ..Default::default()
        };
        assert_eq!(match_score(&a, &b), match_score(&b, &a));
        // a scores 100 against b's industry; b scores only 30 against a's
        assert_eq!(match_score(&a, &b), 100);
    }
}
