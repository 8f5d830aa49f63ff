use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;
use validator::Validate;

use super::required_text;
use crate::{
    error::AppError,
    models::{Models, comment::CreateCommentRequest, post::PostItem},
    utils::jwt::Claims,
};

/// Vote for a post.
/// A user may vote once per post; repeats are answered with 409.
pub async fn vote(
    State(models): State<Models>,
    Extension(claims): Extension<Claims>,
    Path(post_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    // 404 for unknown posts instead of a foreign key fault.
    let post = models.posts.get_by_id(post_id).await?;

    models.votes.add_vote(post.id, user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "voted": true, "post_id": post.id })),
    ))
}

/// List a post together with its comments, newest first.
pub async fn list_comments(
    State(models): State<Models>,
    Path(post_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let post = models.posts.get_by_id(post_id).await?;
    let comments = models.comments.get_comments_for_post(post.id).await?;

    Ok(Json(json!({
        "post": PostItem::new(post, Utc::now()),
        "comments": comments,
    })))
}

/// Create a new comment.
pub async fn create_comment(
    State(models): State<Models>,
    Extension(claims): Extension<Claims>,
    Path(post_id): Path<i64>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let user_id = claims.user_id()?;

    let body = required_text(&payload.body, "comment")?;

    let post = models.posts.get_by_id(post_id).await?;
    let comment_id = models.comments.insert(body, post.id, user_id).await?;

    Ok((StatusCode::CREATED, Json(json!({ "id": comment_id }))))
}
