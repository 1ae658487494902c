//! Promotion evaluation.
//!
//! Selection is first-match in the order the promotions are supplied: the
//! first AVAILABLE promotion whose window contains the reservation is the one
//! that applies, even if a later one would discount more. Callers pass
//! promotions in creation order.

use booking_shared::{
    DiscountType, PriceAdjustment, Promotion, PromotionSnapshot, PromotionStatus,
};
use chrono::Datelike;
use rust_decimal::Decimal;

use super::validator::BookingWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Reservation does not meet promotion conditions")]
pub struct PromotionConditionsNotMet;

/// Price `window` against `promotions`.
///
/// `Ok(None)` means no promotion covers the window and the price stands.
/// A covering promotion whose duration or weekday rule fails is an error,
/// not a silent skip.
pub fn apply(
    window: &BookingWindow,
    promotions: &[Promotion],
) -> Result<Option<PriceAdjustment>, PromotionConditionsNotMet> {
    let Some(promotion) = promotions.iter().find(|p| {
        p.status == PromotionStatus::Available && p.contains(window.start_time, window.end_time)
    }) else {
        return Ok(None);
    };

    // An unrepresentable minimum can never be met
    match promotion.min_duration() {
        Some(min) if window.end_time - window.start_time >= min => {}
        _ => return Err(PromotionConditionsNotMet),
    }

    if !promotion
        .applicable_days
        .contains(&window.start_time.weekday())
    {
        return Err(PromotionConditionsNotMet);
    }

    Ok(Some(PriceAdjustment {
        original_price: window.price,
        adjusted_price: discounted_price(window.price, promotion.discount, promotion.discount_type),
        promotion: PromotionSnapshot {
            promotion_id: promotion.id,
            description: promotion.description.clone(),
            discount: promotion.discount,
            discount_type: promotion.discount_type,
        },
    }))
}

/// Prices are stored as `NUMERIC(12, 2)`.
const PRICE_SCALE: u32 = 2;

/// Never goes below zero. Rounded to cents so the receipt matches the stored row.
pub fn discounted_price(price: Decimal, discount: Decimal, discount_type: DiscountType) -> Decimal {
    let adjusted = match discount_type {
        DiscountType::Percent => price * (Decimal::ONE - discount / Decimal::ONE_HUNDRED),
        DiscountType::Fixed => price - discount,
    };
    adjusted.max(Decimal::ZERO).round_dp(PRICE_SCALE)
}
