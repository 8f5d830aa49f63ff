// src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use validator::Validate;

use super::{
    ModelError,
    constraint::{USERS_EMAIL_KEY, is_duplicate},
};

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    pub username: String,

    /// Unique login email.
    pub email: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password_hash: String,

    /// Inactive accounts cannot log in.
    pub activated: bool,

    pub created_at: DateTime<Utc>,
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Username length must be between 3 and 50 characters."
    ))]
    pub username: String,
    #[validate(email(message = "The value provided is not a valid email address"))]
    pub email: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[derive(Clone)]
pub struct UsersModel {
    pool: PgPool,
}

const USER_COLUMNS: &str = "id, username, email, password_hash, activated, created_at";

impl UsersModel {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Stores a new account. `password_hash` must already be hashed.
    pub async fn insert(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, ModelError> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .bind(email)
            .bind(password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_duplicate(&e, USERS_EMAIL_KEY) {
                    ModelError::DuplicateEmail
                } else {
                    ModelError::Store(e)
                }
            })
    }

    pub async fn get_by_email(&self, email: &str) -> Result<User, ModelError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);

        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ModelError::NotFound)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<User, ModelError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ModelError::NotFound)
    }
}
