use chrono::{DateTime, Duration, Utc, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "promotion_status", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PromotionStatus {
    Available,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "discount_type", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percent,
    Fixed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Promotion {
    pub id: Uuid,
    pub description: String,
    pub discount: Decimal,
    pub discount_type: DiscountType,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: PromotionStatus,
    pub created_by: Uuid,
    /// Minimum reservation length, in minutes.
    pub min_duration_minutes: i64,
    pub applicable_days: Vec<Weekday>,
    pub created_at: DateTime<Utc>,
}

impl Promotion {
    /// `None` when the stored minute count does not fit a `Duration`.
    pub fn min_duration(&self) -> Option<Duration> {
        Duration::try_minutes(self.min_duration_minutes)
    }

    /// True when `[start, end]` lies entirely inside the promotion window.
    pub fn contains(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time <= start && end <= self.end_time
    }
}

/// What a receipt records about the promotion that priced a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionSnapshot {
    pub promotion_id: Uuid,
    pub description: String,
    pub discount: Decimal,
    pub discount_type: DiscountType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceAdjustment {
    pub original_price: Decimal,
    pub adjusted_price: Decimal,
    pub promotion: PromotionSnapshot,
}
