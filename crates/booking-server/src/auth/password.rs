use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::AppError;

const MIN_PASSWORD_LEN: usize = 8;
const PASSWORD_SPECIALS: &str = "@$!%*?&";

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Strength rules for new passwords: length, a digit, a letter and one of `@$!%*?&`.
pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "Password must contain at least one number".to_string(),
        ));
    }
    if !password.chars().any(char::is_alphabetic) {
        return Err(AppError::Validation(
            "Password must contain at least one letter".to_string(),
        ));
    }
    if !password.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
        return Err(AppError::Validation(format!(
            "Password must contain one of {}",
            PASSWORD_SPECIALS
        )));
    }
    Ok(())
}
