use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "schedule_status", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    Available,
    Unavailable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub opening_time: DateTime<Utc>,
    pub closing_time: DateTime<Utc>,
    pub status: ScheduleStatus,
}

impl Schedule {
    /// True when the schedule is open and `[start, end]` falls inside it.
    pub fn covers(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.status == ScheduleStatus::Available
            && self.opening_time <= start
            && end <= self.closing_time
    }
}
