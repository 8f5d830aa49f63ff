use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use super::{
    ModelError,
    constraint::{VOTES_PKEY, is_duplicate},
};

/// One user's vote on one post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Vote {
    pub post_id: i64,
    pub user_id: i64,
}

/// Registers votes. At-most-one-vote-per-user is enforced by `votes_pkey`,
/// so concurrent duplicates resolve in the store without any locking here.
#[derive(Clone)]
pub struct VotesModel {
    pool: PgPool,
}

impl VotesModel {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts the vote unconditionally; a second vote by the same user
    /// yields [`ModelError::DuplicateVote`].
    pub async fn add_vote(&self, post_id: i64, user_id: i64) -> Result<Vote, ModelError> {
        sqlx::query("INSERT INTO votes (post_id, user_id) VALUES ($1, $2)")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_duplicate(&e, VOTES_PKEY) {
                    ModelError::DuplicateVote
                } else {
                    ModelError::Store(e)
                }
            })?;

        Ok(Vote { post_id, user_id })
    }
}
