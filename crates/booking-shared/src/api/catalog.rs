use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{ScheduleStatus, WorkspaceKind};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateWorkspaceRequest {
    pub kind: WorkspaceKind,
    pub capacity: i32,
    pub hourly_rate: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateWorkspaceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<WorkspaceKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateScheduleRequest {
    pub opening_time: DateTime<Utc>,
    pub closing_time: DateTime<Utc>,
    #[serde(default = "default_schedule_status")]
    pub status: ScheduleStatus,
}

fn default_schedule_status() -> ScheduleStatus {
    ScheduleStatus::Available
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateScheduleStatusRequest {
    pub status: ScheduleStatus,
}
