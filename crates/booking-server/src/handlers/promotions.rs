use axum::{
    extract::{Path, State},
    Extension, Json,
};
use booking_shared::{
    api::{CreatePromotionRequest, PromotionQuoteRequest, UpdatePromotionRequest},
    PriceAdjustment, Promotion, Role,
};
use uuid::Uuid;

use crate::auth::{ensure_role, AuthUser};
use crate::booking::{
    pricing,
    validator::{check_price, check_time_range, BookingWindow, ValidationError},
};
use crate::error::AppError;
use crate::routes::AppState;
use crate::store::PromotionFilter;

/// POST /api/v1/promotions
pub async fn create_promotion(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreatePromotionRequest>,
) -> Result<Json<Promotion>, AppError> {
    Ok(Json(state.promotions.create(req, &user).await?))
}

/// GET /api/v1/promotions
pub async fn list_promotions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Promotion>>, AppError> {
    ensure_role(&user, Role::Admin)?;
    Ok(Json(state.promotions.list(PromotionFilter::default()).await?))
}

/// GET /api/v1/promotions/active
pub async fn list_active_promotions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Promotion>>, AppError> {
    ensure_role(&user, Role::Admin)?;
    Ok(Json(state.promotions.list_available().await?))
}

/// GET /api/v1/promotions/:id
pub async fn get_promotion(
    State(state): State<AppState>,
    Path(promotion_id): Path<Uuid>,
) -> Result<Json<Promotion>, AppError> {
    Ok(Json(state.promotions.get(promotion_id).await?))
}

/// PATCH /api/v1/promotions/:id
pub async fn update_promotion(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(promotion_id): Path<Uuid>,
    Json(req): Json<UpdatePromotionRequest>,
) -> Result<Json<Promotion>, AppError> {
    Ok(Json(state.promotions.update(promotion_id, req, &user).await?))
}

/// DELETE /api/v1/promotions/:id
pub async fn delete_promotion(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(promotion_id): Path<Uuid>,
) -> Result<(), AppError> {
    state.promotions.delete(promotion_id, &user).await
}

/// GET /api/v1/users/:id/promotions
pub async fn list_user_promotions(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Promotion>>, AppError> {
    let promotions = state
        .promotions
        .list(PromotionFilter {
            created_by: Some(user_id),
            ..Default::default()
        })
        .await?;

    Ok(Json(promotions))
}

/// POST /api/v1/promotions/quote
///
/// Prices a prospective booking without persisting anything. `null` means no
/// promotion covers the window.
pub async fn quote_promotion(
    State(state): State<AppState>,
    Json(req): Json<PromotionQuoteRequest>,
) -> Result<Json<Option<PriceAdjustment>>, AppError> {
    if state.store.find_workspace(req.workspace_id).await?.is_none() {
        return Err(ValidationError::InvalidWorkspace.into());
    }
    check_time_range(req.start_time, req.end_time)?;
    check_price(req.price)?;

    let window = BookingWindow {
        start_time: req.start_time,
        end_time: req.end_time,
        price: req.price,
    };
    let available = state.promotions.list_available().await?;

    Ok(Json(pricing::apply(&window, &available)?))
}
