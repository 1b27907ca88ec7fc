// Event statistics DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Per-day counters for one event, updated on every scan mutation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DailyStat {
    pub event_id: Uuid,
    pub day: NaiveDate,
    pub check_ins: i64,
    pub check_outs: i64,
    pub leads: i64,
    pub matches: i64,
}
