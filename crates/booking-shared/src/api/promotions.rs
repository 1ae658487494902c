use chrono::{DateTime, Utc, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{DiscountType, PromotionStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePromotionRequest {
    pub description: String,
    pub discount: Decimal,
    pub discount_type: DiscountType,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default = "default_promotion_status")]
    pub status: PromotionStatus,
    #[serde(default)]
    pub min_duration_minutes: i64,
    pub applicable_days: Vec<Weekday>,
}

fn default_promotion_status() -> PromotionStatus {
    PromotionStatus::Available
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePromotionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_type: Option<DiscountType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PromotionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_duration_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicable_days: Option<Vec<Weekday>>,
}

/// Price a prospective reservation against the currently available promotions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionQuoteRequest {
    pub workspace_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub price: Decimal,
}
