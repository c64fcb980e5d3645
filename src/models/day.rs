use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One A/B rotation label per calendar date. Absence of a row means the
/// date has no assigned schedule.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DaySchedule {
    pub date: String,
    pub schedule: String,
}

/// Free-form annotation for a date (e.g. "no-school", "late-start").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DayType {
    pub date: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
}

/// Shared request shape for both per-date resources. A null or absent
/// value field clears the row for that date.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetDayRequest {
    pub date: Option<String>,
    pub schedule: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}
