use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use validator::Validate;

use super::ModelError;

/// A comment joined with its author's username.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub body: String,
    pub post_id: i64,
    pub user_id: i64,
    pub username: String,
}

/// DTO for creating a new comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(
        min = 1,
        max = 1000,
        message = "Comment must be between 1 and 1000 characters"
    ))]
    pub body: String,
}

#[derive(Clone)]
pub struct CommentsModel {
    pool: PgPool,
}

impl CommentsModel {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All comments on a post, newest first.
    pub async fn get_comments_for_post(&self, post_id: i64) -> Result<Vec<Comment>, ModelError> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT c.id, c.created_at, c.body, c.post_id, c.user_id, u.username
            FROM comments c
            JOIN users u ON c.user_id = u.id
            WHERE c.post_id = $1
            ORDER BY c.created_at DESC, c.id DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    /// Persists a comment. Body presence and length are checked by the caller.
    pub async fn insert(&self, body: &str, post_id: i64, user_id: i64) -> Result<i64, ModelError> {
        let id = sqlx::query_scalar(
            r#"
            INSERT INTO comments (body, post_id, user_id)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(body)
        .bind(post_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }
}
