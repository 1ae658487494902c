use std::sync::OnceLock;

use axum::{extract::State, Extension, Json};
use booking_shared::api::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest};
use booking_shared::{Person, Role};
use chrono::Utc;
use regex::Regex;
use uuid::Uuid;

use crate::auth::{authenticate, create_access_token, hash_password, validate_password, AuthUser};
use crate::error::AppError;
use crate::routes::AppState;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
    })
}

fn issue_token(
    state: &AppState,
    person_id: Uuid,
    email: &str,
    role: Role,
) -> Result<AuthResponse, AppError> {
    let access_token = create_access_token(
        person_id,
        email,
        role,
        &state.config.jwt_secret,
        state.config.jwt_expires_in,
    )?;

    Ok(AuthResponse {
        access_token,
        token_type: "Bearer".to_string(),
        user_id: person_id,
        role,
    })
}

/// POST /api/v1/auth/register
///
/// Always creates a USER. Admins are seeded at startup or promoted by another admin.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let name = req.name.trim();
    let email = req.email.trim().to_lowercase();

    if name.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation("All fields are required".to_string()));
    }

    if !email_pattern().is_match(&email) {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }

    validate_password(&req.password)?;

    let person = Person {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email,
        password_hash: hash_password(&req.password)?,
        role: Role::User,
        created_at: Utc::now(),
    };

    // Duplicate emails surface as Conflict from the store
    state.store.insert_person(&person).await?;
    tracing::info!(person_id = %person.id, role = ?person.role, "Person registered");

    Ok(Json(issue_token(&state, person.id, &person.email, person.role)?))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = req.email.trim().to_lowercase();
    let principal = authenticate(state.store.as_ref(), &email, &req.password).await?;

    Ok(Json(issue_token(
        &state,
        principal.id,
        &principal.email,
        principal.role,
    )?))
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Person>, AppError> {
    let person = state
        .store
        .find_person(user.id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(person))
}

/// PATCH /api/v1/auth/me
pub async fn update_me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<Person>, AppError> {
    let mut person = state
        .store
        .find_person(user.id)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(name) = req.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Name cannot be empty".to_string()));
        }
        person.name = name.to_string();
    }

    if let Some(password) = req.password {
        validate_password(&password)?;
        person.password_hash = hash_password(&password)?;
    }

    state.store.update_person(&person).await?;

    Ok(Json(person))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_pattern() {
        assert!(email_pattern().is_match("ana@example.com"));
        assert!(!email_pattern().is_match("ana.example.com"));
        assert!(!email_pattern().is_match("ana@example"));
        assert!(!email_pattern().is_match("a na@example.com"));
    }
}
