use axum::{
    extract::{Path, State},
    Extension, Json,
};
use booking_shared::{
    api::{CreateWorkspaceRequest, UpdateWorkspaceRequest},
    Role, Workspace,
};
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::auth::{ensure_role, AuthUser};
use crate::error::AppError;
use crate::routes::AppState;

fn validate_workspace(workspace: &Workspace) -> Result<(), AppError> {
    if workspace.capacity < 1 {
        return Err(AppError::Validation(
            "Capacity must be greater than 0".to_string(),
        ));
    }
    if workspace.hourly_rate <= Decimal::ZERO {
        return Err(AppError::Validation(
            "Hourly rate must be positive".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/v1/workspaces
pub async fn create_workspace(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateWorkspaceRequest>,
) -> Result<Json<Workspace>, AppError> {
    ensure_role(&user, Role::Admin)?;

    let workspace = Workspace {
        id: Uuid::new_v4(),
        kind: req.kind,
        capacity: req.capacity,
        hourly_rate: req.hourly_rate,
        created_by: user.id,
        created_at: Utc::now(),
    };
    validate_workspace(&workspace)?;

    state.store.insert_workspace(&workspace).await?;
    tracing::info!(workspace_id = %workspace.id, "Workspace created");

    Ok(Json(workspace))
}

/// GET /api/v1/workspaces
pub async fn list_workspaces(
    State(state): State<AppState>,
) -> Result<Json<Vec<Workspace>>, AppError> {
    Ok(Json(state.store.list_workspaces().await?))
}

/// GET /api/v1/workspaces/:id
pub async fn get_workspace(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
) -> Result<Json<Workspace>, AppError> {
    let workspace = state
        .store
        .find_workspace(workspace_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(workspace))
}

/// PATCH /api/v1/workspaces/:id
pub async fn update_workspace(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(workspace_id): Path<Uuid>,
    Json(req): Json<UpdateWorkspaceRequest>,
) -> Result<Json<Workspace>, AppError> {
    ensure_role(&user, Role::Admin)?;

    let mut workspace = state
        .store
        .find_workspace(workspace_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(kind) = req.kind {
        workspace.kind = kind;
    }
    if let Some(capacity) = req.capacity {
        workspace.capacity = capacity;
    }
    if let Some(hourly_rate) = req.hourly_rate {
        workspace.hourly_rate = hourly_rate;
    }
    validate_workspace(&workspace)?;

    state.store.update_workspace(&workspace).await?;

    Ok(Json(workspace))
}

/// DELETE /api/v1/workspaces/:id
pub async fn delete_workspace(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(workspace_id): Path<Uuid>,
) -> Result<(), AppError> {
    ensure_role(&user, Role::Admin)?;

    // Cascades to schedules and reservations
    if !state.store.delete_workspace(workspace_id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(workspace_id = %workspace_id, "Workspace deleted");

    Ok(())
}
