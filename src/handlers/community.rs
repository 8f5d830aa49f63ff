use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;
use validator::Validate;

use super::required_text;
use crate::{
    config::Config,
    error::AppError,
    models::{
        Models,
        filters::{FeedParams, PageLinks},
        post::{CreatePostRequest, PostItem},
    },
    utils::jwt::Claims,
};

/// List the feed.
/// Supports title search, popular/recent ranking and page-number pagination.
pub async fn list_posts(
    State(models): State<Models>,
    State(config): State<Config>,
    Query(params): Query<FeedParams>,
) -> Result<impl IntoResponse, AppError> {
    let filters = params.into_filters(config.default_page_size);
    filters.validate()?;

    let (posts, meta) = models.posts.get_posts(&filters).await?;

    let now = Utc::now();
    let links = PageLinks::new(&filters, &meta);
    let posts: Vec<PostItem> = posts.into_iter().map(|p| PostItem::new(p, now)).collect();

    Ok(Json(json!({
        "posts": posts,
        "meta": meta,
        "links": links,
    })))
}

/// Get a single post by ID.
pub async fn get_post(
    State(models): State<Models>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let post = models.posts.get_by_id(id).await?;

    Ok(Json(PostItem::new(post, Utc::now())))
}

/// Submit a new link.
/// Requires: Login.
pub async fn create_post(
    State(models): State<Models>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let user_id = claims.user_id()?;

    let title = required_text(&payload.title, "title")?;

    let post_id = models
        .posts
        .insert(title, payload.url.trim(), user_id)
        .await?;

    tracing::info!(post_id, user_id, "post submitted");

    Ok((StatusCode::CREATED, Json(json!({ "id": post_id }))))
}
