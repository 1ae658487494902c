use std::sync::Arc;

use booking_shared::{
    api::{CreatePromotionRequest, UpdatePromotionRequest},
    DiscountType, Promotion, PromotionStatus, Role,
};
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::auth::{require_role, AuthUser};
use crate::error::AppError;
use crate::store::{PromotionFilter, Store};

#[derive(Clone)]
pub struct PromotionService {
    store: Arc<dyn Store>,
}

impl PromotionService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        req: CreatePromotionRequest,
        actor: &AuthUser,
    ) -> Result<Promotion, AppError> {
        self.ensure_admin(actor).await?;

        let promotion = Promotion {
            id: Uuid::new_v4(),
            description: req.description.trim().to_string(),
            discount: req.discount,
            discount_type: req.discount_type,
            start_time: req.start_time,
            end_time: req.end_time,
            status: req.status,
            created_by: actor.id,
            min_duration_minutes: req.min_duration_minutes,
            applicable_days: req.applicable_days,
            created_at: Utc::now(),
        };
        check_promotion(&promotion)?;

        self.store.insert_promotion(&promotion).await?;
        tracing::info!(promotion_id = %promotion.id, created_by = %actor.id, "Promotion created");

        Ok(promotion)
    }

    pub async fn update(
        &self,
        id: Uuid,
        req: UpdatePromotionRequest,
        actor: &AuthUser,
    ) -> Result<Promotion, AppError> {
        self.ensure_admin(actor).await?;
        let mut promotion = self.get(id).await?;

        if let Some(description) = req.description {
            promotion.description = description.trim().to_string();
        }
        if let Some(discount) = req.discount {
            promotion.discount = discount;
        }
        if let Some(discount_type) = req.discount_type {
            promotion.discount_type = discount_type;
        }
        if let Some(start_time) = req.start_time {
            promotion.start_time = start_time;
        }
        if let Some(end_time) = req.end_time {
            promotion.end_time = end_time;
        }
        if let Some(status) = req.status {
            promotion.status = status;
        }
        if let Some(minutes) = req.min_duration_minutes {
            promotion.min_duration_minutes = minutes;
        }
        if let Some(days) = req.applicable_days {
            promotion.applicable_days = days;
        }
        check_promotion(&promotion)?;

        self.store.update_promotion(&promotion).await?;
        tracing::info!(promotion_id = %id, "Promotion updated");

        Ok(promotion)
    }

    pub async fn delete(&self, id: Uuid, actor: &AuthUser) -> Result<(), AppError> {
        self.ensure_admin(actor).await?;

        if !self.store.delete_promotion(id).await? {
            return Err(AppError::NotFound);
        }
        tracing::info!(promotion_id = %id, "Promotion deleted");
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<Promotion, AppError> {
        self.store
            .find_promotion(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn list(&self, filter: PromotionFilter) -> Result<Vec<Promotion>, AppError> {
        self.store.list_promotions(filter).await
    }

    pub async fn list_available(&self) -> Result<Vec<Promotion>, AppError> {
        self.list(PromotionFilter {
            status: Some(PromotionStatus::Available),
            ..Default::default()
        })
        .await
    }

    /// The token role is re-checked against the stored person so a demoted
    /// admin loses access before their token expires.
    async fn ensure_admin(&self, actor: &AuthUser) -> Result<(), AppError> {
        let person = self
            .store
            .find_person(actor.id)
            .await?
            .ok_or(AppError::Forbidden)?;

        if require_role(actor, Role::Admin) && person.role.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

fn check_promotion(promotion: &Promotion) -> Result<(), AppError> {
    if promotion.description.is_empty() {
        return Err(AppError::Validation("Description cannot be empty".to_string()));
    }
    if promotion.discount <= Decimal::ZERO {
        return Err(AppError::Validation(
            "Discount must be greater than zero".to_string(),
        ));
    }
    if promotion.discount_type == DiscountType::Percent && promotion.discount > Decimal::ONE_HUNDRED
    {
        return Err(AppError::Validation(
            "Percent discount cannot exceed 100".to_string(),
        ));
    }
    if promotion.start_time >= promotion.end_time {
        return Err(AppError::Validation(
            "Start time must be before end time".to_string(),
        ));
    }
    if promotion.min_duration_minutes < 0 {
        return Err(AppError::Validation(
            "Minimum duration cannot be negative".to_string(),
        ));
    }
    // No reservation inside the window can be longer than the window itself
    match promotion.min_duration() {
        Some(min) if min <= promotion.end_time - promotion.start_time => {}
        _ => {
            return Err(AppError::Validation(
                "Minimum duration cannot exceed the promotion window".to_string(),
            ))
        }
    }
    if promotion.applicable_days.is_empty() {
        return Err(AppError::Validation(
            "At least one applicable day is required".to_string(),
        ));
    }
    Ok(())
}
