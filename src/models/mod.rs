// src/models/mod.rs

pub mod comment;
pub mod constraint;
pub mod error;
pub mod feed_query;
pub mod filters;
pub mod post;
pub mod user;
pub mod vote;

use sqlx::PgPool;

pub use error::ModelError;

use self::{comment::CommentsModel, post::PostsModel, user::UsersModel, vote::VotesModel};

/// All store-backed models, sharing one connection pool.
#[derive(Clone)]
pub struct Models {
    pub users: UsersModel,
    pub posts: PostsModel,
    pub comments: CommentsModel,
    pub votes: VotesModel,
}

impl Models {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UsersModel::new(pool.clone()),
            posts: PostsModel::new(pool.clone()),
            comments: CommentsModel::new(pool.clone()),
            votes: VotesModel::new(pool),
        }
    }
}
