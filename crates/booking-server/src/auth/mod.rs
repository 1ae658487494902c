mod jwt;
mod middleware;
mod password;

use booking_shared::{Person, Role};
use chrono::Utc;
use uuid::Uuid;

use crate::config::AdminSeed;
use crate::error::AppError;
use crate::store::Store;

pub use jwt::{create_access_token, verify_access_token};
pub use middleware::{auth_middleware, AuthUser};
pub use password::{hash_password, validate_password, verify_password};

/// Resolve credentials to a principal. Unknown email and wrong password
/// are indistinguishable to the caller.
pub async fn authenticate(
    store: &dyn Store,
    email: &str,
    password: &str,
) -> Result<AuthUser, AppError> {
    let person: Person = store
        .find_person_by_email(email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(password, &person.password_hash)? {
        return Err(AppError::Unauthorized);
    }

    Ok(AuthUser {
        id: person.id,
        email: person.email,
        role: person.role,
    })
}

pub fn require_role(principal: &AuthUser, role: Role) -> bool {
    principal.role == role
}

/// `require_role` as an early return for handlers.
pub fn ensure_role(principal: &AuthUser, role: Role) -> Result<(), AppError> {
    if require_role(principal, role) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Create the seeded admin unless the email is already registered.
/// An existing account is left untouched, whatever its role.
pub async fn seed_admin(store: &dyn Store, seed: &AdminSeed) -> Result<Option<Person>, AppError> {
    if let Some(existing) = store.find_person_by_email(&seed.email).await? {
        if !existing.role.is_admin() {
            tracing::warn!(
                person_id = %existing.id,
                "Seed admin email belongs to a non-admin account"
            );
        }
        return Ok(None);
    }

    validate_password(&seed.password)?;

    let person = Person {
        id: Uuid::new_v4(),
        name: seed.name.clone(),
        email: seed.email.clone(),
        password_hash: hash_password(&seed.password)?,
        role: Role::Admin,
        created_at: Utc::now(),
    };
    store.insert_person(&person).await?;
    tracing::info!(person_id = %person.id, "Admin account seeded");

    Ok(Some(person))
}
