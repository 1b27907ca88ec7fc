// Check-in/checkout toggle decision rule
//
// Current attendance is derived from the latest logged record, not stored
// as independent truth. Both the indexed query path and the client-side
// fallback sort go through the same two functions so the decision cannot
// diverge between paths.

use uuid::Uuid;

use crate::domain::{CheckDirection, CheckInRecord};

/// Next direction given the latest logged record: latest `in` toggles to
/// `out`; anything else (including no prior record) is `in`.
pub fn next_direction(latest: Option<CheckDirection>) -> CheckDirection {
    match latest {
        Some(CheckDirection::In) => CheckDirection::Out,
        _ => CheckDirection::In,
    }
}

/// Client-side replacement for the ordered/limited query: pick the most
/// recent record for `user_id` out of an unordered event-wide fetch.
/// Ties on timestamp break on the time-ordered id.
pub fn latest_for_user(records: &[CheckInRecord], user_id: Uuid) -> Option<&CheckInRecord> {
    records
        .iter()
        .filter(|r| r.user_id == user_id)
        .max_by_key(|r| (r.created_at, r.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn record(user_id: Uuid, direction: CheckDirection, offset_secs: i64) -> CheckInRecord {
        CheckInRecord {
            id: Uuid::now_v7(),
            user_id,
            event_id: Uuid::now_v7(),
            direction,
            agent_id: None,
            created_at: Utc::now() + Duration::seconds(offset_secs),
        }
    }

    #[test]
    fn no_prior_record_checks_in() {
        assert_eq!(next_direction(None), CheckDirection::In);
    }

    #[test]
    fn latest_in_toggles_out_and_back() {
        assert_eq!(
            next_direction(Some(CheckDirection::In)),
            CheckDirection::Out
        );
        assert_eq!(
            next_direction(Some(CheckDirection::Out)),
            CheckDirection::In
        );
    }

    #[test]
    fn fallback_sort_matches_indexed_order() {
        let user = Uuid::now_v7();
        let other = Uuid::now_v7();
        // deliberately shuffled: newest record in the middle
        let records = vec![
            record(user, CheckDirection::In, 10),
            record(user, CheckDirection::Out, 30),
            record(other, CheckDirection::In, 50),
            record(user, CheckDirection::In, 20),
        ];

        let latest = latest_for_user(&records, user).unwrap();
        assert_eq!(latest.direction, CheckDirection::Out);

        // same decision the indexed ORDER BY ... LIMIT 1 path would make
        assert_eq!(
            next_direction(Some(latest.direction)),
            CheckDirection::In
        );
    }

    #[test]
    fn fallback_ignores_other_users() {
        let user = Uuid::now_v7();
        let records = vec![record(Uuid::now_v7(), CheckDirection::In, 0)];
        assert!(latest_for_user(&records, user).is_none());
    }
}
