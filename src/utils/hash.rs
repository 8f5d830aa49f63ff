//! Argon2 password hashing for account credentials.

use argon2::{
    Argon2,
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::AppError;

fn hashing_failed(err: password_hash::Error) -> AppError {
    AppError::InternalServerError(format!("password hashing failed: {}", err))
}

/// Hashes `password` with a fresh random salt into a PHC string.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(hashing_failed)
}

/// Checks `password` against a stored PHC string.
/// A mismatch is `Ok(false)`; only an unreadable stored hash is an error.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, AppError> {
    let stored = PasswordHash::new(stored).map_err(hashing_failed)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &stored)
        .is_ok())
}
