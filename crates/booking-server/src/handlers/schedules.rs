use axum::{
    extract::{Path, State},
    Extension, Json,
};
use booking_shared::{
    api::{CreateScheduleRequest, UpdateScheduleStatusRequest},
    Role, Schedule,
};
use uuid::Uuid;

use crate::auth::{ensure_role, AuthUser};
use crate::error::AppError;
use crate::routes::AppState;

/// Helper to verify the workspace exists before touching its schedules
async fn verify_workspace(state: &AppState, workspace_id: Uuid) -> Result<(), AppError> {
    if state.store.find_workspace(workspace_id).await?.is_none() {
        return Err(AppError::NotFound);
    }
    Ok(())
}

/// Helper to verify the schedule belongs to the workspace
async fn verify_schedule(
    state: &AppState,
    workspace_id: Uuid,
    schedule_id: Uuid,
) -> Result<(), AppError> {
    verify_workspace(state, workspace_id).await?;

    let schedules = state.store.list_schedules(workspace_id).await?;
    if !schedules.iter().any(|s| s.id == schedule_id) {
        return Err(AppError::NotFound);
    }
    Ok(())
}

/// POST /api/v1/workspaces/:id/schedules
pub async fn create_schedule(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(workspace_id): Path<Uuid>,
    Json(req): Json<CreateScheduleRequest>,
) -> Result<Json<Schedule>, AppError> {
    ensure_role(&user, Role::Admin)?;
    verify_workspace(&state, workspace_id).await?;

    if req.closing_time <= req.opening_time {
        return Err(AppError::Validation(
            "Closing time must be after opening time".to_string(),
        ));
    }

    let schedule = Schedule {
        id: Uuid::new_v4(),
        workspace_id,
        opening_time: req.opening_time,
        closing_time: req.closing_time,
        status: req.status,
    };
    state.store.insert_schedule(&schedule).await?;

    Ok(Json(schedule))
}

/// GET /api/v1/workspaces/:id/schedules
pub async fn list_schedules(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
) -> Result<Json<Vec<Schedule>>, AppError> {
    verify_workspace(&state, workspace_id).await?;
    Ok(Json(state.store.list_schedules(workspace_id).await?))
}

/// PATCH /api/v1/workspaces/:id/schedules/:schedule_id
pub async fn update_schedule_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((workspace_id, schedule_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateScheduleStatusRequest>,
) -> Result<Json<Schedule>, AppError> {
    ensure_role(&user, Role::Admin)?;
    verify_schedule(&state, workspace_id, schedule_id).await?;

    let schedule = state
        .store
        .set_schedule_status(schedule_id, req.status)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(schedule))
}

/// DELETE /api/v1/workspaces/:id/schedules/:schedule_id
pub async fn delete_schedule(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((workspace_id, schedule_id)): Path<(Uuid, Uuid)>,
) -> Result<(), AppError> {
    ensure_role(&user, Role::Admin)?;
    verify_schedule(&state, workspace_id, schedule_id).await?;

    if !state.store.delete_schedule(schedule_id).await? {
        return Err(AppError::NotFound);
    }
    Ok(())
}
