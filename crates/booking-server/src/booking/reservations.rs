use std::sync::Arc;

use booking_shared::{
    api::{CreateReservationRequest, ReservationReceipt, UpdateReservationRequest},
    PromotionStatus, Reservation, ReservationStatus,
};
use chrono::Utc;
use uuid::Uuid;

use super::pricing;
use super::validator::{self, ReservationDraft, ValidatedReservation, ValidationError};
use crate::error::AppError;
use crate::store::{PromotionFilter, ReservationFilter, Store};

/// Creates, edits and cancels reservations on top of the injected store.
///
/// The read-validate-write sequence is not atomic: two overlapping requests
/// for the same workspace can both succeed.
#[derive(Clone)]
pub struct ReservationService {
    store: Arc<dyn Store>,
    enforce_schedule_window: bool,
}

impl ReservationService {
    pub fn new(store: Arc<dyn Store>, enforce_schedule_window: bool) -> Self {
        Self {
            store,
            enforce_schedule_window,
        }
    }

    pub async fn create(&self, req: CreateReservationRequest) -> Result<ReservationReceipt, AppError> {
        let draft = ReservationDraft::from(&req);
        let validated = self.validate(&draft).await?;

        let mut price = draft.price;
        let mut promotion = None;

        if req.apply_promotion {
            let available = self
                .store
                .list_promotions(PromotionFilter {
                    status: Some(PromotionStatus::Available),
                    ..Default::default()
                })
                .await?;

            if let Some(adjustment) = pricing::apply(&validated.window(), &available)? {
                tracing::debug!(
                    promotion_id = %adjustment.promotion.promotion_id,
                    original = %adjustment.original_price,
                    adjusted = %adjustment.adjusted_price,
                    "Promotion applied"
                );
                price = adjustment.adjusted_price;
                promotion = Some(adjustment.promotion);
            }
        }

        let window = validated.window();
        let reservation = Reservation {
            id: Uuid::new_v4(),
            reserved_by: validated.reserved_by(),
            workspace_id: validated.workspace_id(),
            start_time: window.start_time,
            end_time: window.end_time,
            status: ReservationStatus::Active,
            price,
            cancelled_at: None,
            created_at: Utc::now(),
        };

        self.store.insert_reservation(&reservation).await?;

        tracing::info!(
            reservation_id = %reservation.id,
            workspace_id = %reservation.workspace_id,
            reserved_by = %reservation.reserved_by,
            "Reservation created"
        );

        Ok(ReservationReceipt {
            reservation,
            promotion,
        })
    }

    /// Applies the given changes and re-validates the resulting reservation
    /// as if it were being created.
    pub async fn update(&self, id: Uuid, req: UpdateReservationRequest) -> Result<Reservation, AppError> {
        let mut reservation = self.get(id).await?;

        if reservation.is_cancelled() {
            return Err(ValidationError::InvalidStatus.into());
        }

        let draft = ReservationDraft {
            reserved_by: reservation.reserved_by,
            workspace_id: req.workspace_id.unwrap_or(reservation.workspace_id),
            start_time: req.start_time.unwrap_or(reservation.start_time),
            end_time: req.end_time.unwrap_or(reservation.end_time),
            status: reservation.status,
            price: req.price.unwrap_or(reservation.price),
        };
        let validated = self.validate(&draft).await?;
        let window = validated.window();

        reservation.workspace_id = validated.workspace_id();
        reservation.start_time = window.start_time;
        reservation.end_time = window.end_time;
        reservation.price = window.price;

        self.store.update_reservation(&reservation).await?;

        tracing::info!(reservation_id = %reservation.id, "Reservation updated");

        Ok(reservation)
    }

    /// Cancelling an already cancelled reservation returns it untouched.
    pub async fn cancel(&self, id: Uuid) -> Result<Reservation, AppError> {
        let mut reservation = self.get(id).await?;

        if reservation.is_cancelled() {
            tracing::debug!(reservation_id = %id, "Reservation already cancelled");
            return Ok(reservation);
        }

        reservation.status = ReservationStatus::Cancelled;
        reservation.cancelled_at = Some(Utc::now());
        self.store.update_reservation(&reservation).await?;

        tracing::info!(reservation_id = %id, "Reservation cancelled");

        Ok(reservation)
    }

    pub async fn get(&self, id: Uuid) -> Result<Reservation, AppError> {
        self.store
            .find_reservation(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn list_all(&self) -> Result<Vec<Reservation>, AppError> {
        self.store.list_reservations(ReservationFilter::default()).await
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Reservation>, AppError> {
        self.store
            .list_reservations(ReservationFilter {
                reserved_by: Some(user_id),
                ..Default::default()
            })
            .await
    }

    pub async fn list_cancelled(&self) -> Result<Vec<Reservation>, AppError> {
        self.store
            .list_reservations(ReservationFilter {
                status: Some(ReservationStatus::Cancelled),
                ..Default::default()
            })
            .await
    }

    async fn validate(&self, draft: &ReservationDraft) -> Result<ValidatedReservation, AppError> {
        let user = self.store.find_person(draft.reserved_by).await?;
        let workspace = self.store.find_workspace(draft.workspace_id).await?;

        let validated = validator::validate(draft, user.as_ref(), workspace.as_ref())?;

        if self.enforce_schedule_window {
            let schedules = self.store.list_schedules(validated.workspace_id()).await?;
            validator::ensure_within_schedule(&validated, &schedules)?;
        }

        Ok(validated)
    }
}
