use axum::{
    extract::{Path, State},
    Extension, Json,
};
use booking_shared::{
    api::{
        CancelReservationResponse, CreateReservationRequest, ReservationReceipt,
        UpdateReservationRequest,
    },
    Reservation, Role,
};
use uuid::Uuid;

use crate::auth::{ensure_role, require_role, AuthUser};
use crate::error::AppError;
use crate::routes::AppState;

/// Users act on their own reservations; admins on anyone's.
fn ensure_owner_or_admin(user: &AuthUser, owner: Uuid) -> Result<(), AppError> {
    if user.id == owner || require_role(user, Role::Admin) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// POST /api/v1/reservations
pub async fn create_reservation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateReservationRequest>,
) -> Result<Json<ReservationReceipt>, AppError> {
    ensure_owner_or_admin(&user, req.reserved_by)?;

    let receipt = state.reservations.create(req).await?;
    Ok(Json(receipt))
}

/// GET /api/v1/reservations
pub async fn list_reservations(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Reservation>>, AppError> {
    ensure_role(&user, Role::Admin)?;
    Ok(Json(state.reservations.list_all().await?))
}

/// GET /api/v1/reservations/cancelled
pub async fn list_cancelled_reservations(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Reservation>>, AppError> {
    ensure_role(&user, Role::Admin)?;
    Ok(Json(state.reservations.list_cancelled().await?))
}

/// GET /api/v1/reservations/:id
pub async fn get_reservation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(reservation_id): Path<Uuid>,
) -> Result<Json<Reservation>, AppError> {
    let reservation = state.reservations.get(reservation_id).await?;
    ensure_owner_or_admin(&user, reservation.reserved_by)?;

    Ok(Json(reservation))
}

/// PATCH /api/v1/reservations/:id
pub async fn update_reservation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(reservation_id): Path<Uuid>,
    Json(req): Json<UpdateReservationRequest>,
) -> Result<Json<Reservation>, AppError> {
    let existing = state.reservations.get(reservation_id).await?;
    ensure_owner_or_admin(&user, existing.reserved_by)?;

    let reservation = state.reservations.update(reservation_id, req).await?;
    Ok(Json(reservation))
}

/// DELETE /api/v1/reservations/:id
///
/// Cancels rather than deletes; the record stays for history.
pub async fn cancel_reservation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(reservation_id): Path<Uuid>,
) -> Result<Json<CancelReservationResponse>, AppError> {
    let existing = state.reservations.get(reservation_id).await?;
    ensure_owner_or_admin(&user, existing.reserved_by)?;

    let reservation = state.reservations.cancel(reservation_id).await?;
    Ok(Json(CancelReservationResponse {
        id: reservation.id,
        status: reservation.status,
        cancelled_at: reservation.cancelled_at,
    }))
}

/// GET /api/v1/users/:id/reservations
pub async fn list_user_reservations(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Reservation>>, AppError> {
    ensure_owner_or_admin(&user, user_id)?;
    Ok(Json(state.reservations.list_by_user(user_id).await?))
}
