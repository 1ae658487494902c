use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "workspace_kind", rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceKind {
    Office,
    MeetingRoom,
    Desk,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    pub id: Uuid,
    pub kind: WorkspaceKind,
    pub capacity: i32,
    pub hourly_rate: Decimal,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}
