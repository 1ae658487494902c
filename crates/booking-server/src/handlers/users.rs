use axum::{
    extract::{Path, State},
    Extension, Json,
};
use booking_shared::{api::UpdateRoleRequest, Person, Role};
use uuid::Uuid;

use crate::auth::{ensure_role, AuthUser};
use crate::error::AppError;
use crate::routes::AppState;

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Person>>, AppError> {
    ensure_role(&user, Role::Admin)?;
    Ok(Json(state.store.list_persons().await?))
}

/// GET /api/v1/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(person_id): Path<Uuid>,
) -> Result<Json<Person>, AppError> {
    if user.id != person_id {
        ensure_role(&user, Role::Admin)?;
    }

    let person = state
        .store
        .find_person(person_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(person))
}

/// PATCH /api/v1/users/:id/role
pub async fn update_user_role(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(person_id): Path<Uuid>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<Json<Person>, AppError> {
    ensure_role(&user, Role::Admin)?;

    if user.id == person_id && req.role != Role::Admin {
        return Err(AppError::Validation(
            "Admins cannot demote themselves".to_string(),
        ));
    }

    let mut person = state
        .store
        .find_person(person_id)
        .await?
        .ok_or(AppError::NotFound)?;

    person.role = req.role;
    state.store.update_person(&person).await?;
    tracing::info!(
        person_id = %person_id,
        role = ?person.role,
        changed_by = %user.id,
        "Role changed"
    );

    Ok(Json(person))
}

/// DELETE /api/v1/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(person_id): Path<Uuid>,
) -> Result<(), AppError> {
    ensure_role(&user, Role::Admin)?;

    if user.id == person_id {
        return Err(AppError::Validation(
            "Admins cannot delete their own account".to_string(),
        ));
    }

    // Refused with Conflict while the person still owns records
    if !state.store.delete_person(person_id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(person_id = %person_id, deleted_by = %user.id, "Person deleted");

    Ok(())
}
