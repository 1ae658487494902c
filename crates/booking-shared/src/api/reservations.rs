use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{PromotionSnapshot, Reservation, ReservationStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReservationRequest {
    pub reserved_by: Uuid,
    pub workspace_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// New reservations must start out active; anything else is rejected.
    #[serde(default)]
    pub status: ReservationStatus,
    pub price: Decimal,
    #[serde(default)]
    pub apply_promotion: bool,
}

/// Fields a caller wants to change. Omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateReservationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationReceipt {
    pub reservation: Reservation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PromotionSnapshot>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CancelReservationResponse {
    pub id: Uuid,
    pub status: ReservationStatus,
    pub cancelled_at: Option<DateTime<Utc>>,
}
