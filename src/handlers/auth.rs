// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::{
        ModelError, Models,
        user::{CreateUserRequest, LoginRequest},
    },
    utils::{
        hash::{hash_password, verify_password},
        jwt::sign_jwt,
    },
};

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created and the user object (excluding password).
pub async fn register(
    State(models): State<Models>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let hashed_password = hash_password(&payload.password)?;

    let user = models
        .users
        .insert(payload.username.trim(), &payload.email, &hashed_password)
        .await?;

    tracing::info!(user_id = user.id, "user registered");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Authenticates a user by email and password and returns a JWT token.
pub async fn login(
    State(models): State<Models>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = models
        .users
        .get_by_email(&payload.email)
        .await
        .map_err(|e| match e {
            ModelError::NotFound => AppError::AuthError("Invalid login".to_string()),
            other => AppError::from(other),
        })?;

    if !user.activated {
        return Err(AppError::AuthError("User account is inactive".to_string()));
    }

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::AuthError("Invalid login".to_string()));
    }

    let token = sign_jwt(
        user.id,
        &user.username,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "username": user.username,
    })))
}
