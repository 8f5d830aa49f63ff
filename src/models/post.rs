use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use url::Url;
use validator::Validate;

use crate::utils::time::diff_for_humans;

use super::{
    ModelError,
    constraint::{POSTS_TITLE_KEY, is_duplicate},
    feed_query::FeedQuery,
    filters::{Filters, MetaData, calculate_metadata},
};

/// A submitted link with its read-time counts.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub user_id: i64,

    /// Author username. Absent only if the author row is gone.
    pub username: Option<String>,

    pub comment_count: i64,
    pub votes: i64,

    /// Window total-count of the query that produced this row.
    #[serde(skip)]
    pub total_records: i64,
}

impl Post {
    /// Host part of the link, or an empty string when it does not parse.
    pub fn host(&self) -> String {
        Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_owned))
            .unwrap_or_default()
    }
}

/// A post as presented in listings.
#[derive(Debug, Clone, Serialize)]
pub struct PostItem {
    #[serde(flatten)]
    pub post: Post,
    pub host: String,
    pub posted_ago: String,
}

impl PostItem {
    pub fn new(post: Post, now: DateTime<Utc>) -> Self {
        Self {
            host: post.host(),
            posted_ago: diff_for_humans(post.created_at, now),
            post,
        }
    }
}

/// DTO for submitting a new link.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title length must be between 1 and 100 chars"
    ))]
    pub title: String,

    #[validate(
        length(min = 1, max = 255, message = "URL length must be between 1 and 255 chars"),
        custom(function = validate_link)
    )]
    pub url: String,
}

/// Requires an absolute URL with both scheme and host.
fn validate_link(url: &str) -> Result<(), validator::ValidationError> {
    match Url::parse(url) {
        Ok(parsed) if parsed.has_host() => Ok(()),
        _ => Err(validator::ValidationError::new("invalid_url")
            .with_message("url is not a valid URL".into())),
    }
}

/// Read and write access to `posts`.
#[derive(Clone)]
pub struct PostsModel {
    pool: PgPool,
}

impl PostsModel {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One feed page plus its metadata.
    ///
    /// `filters` must already be validated. A page past the end yields no
    /// posts and zero-valued metadata.
    pub async fn get_posts(&self, filters: &Filters) -> Result<(Vec<Post>, MetaData), ModelError> {
        let composed = FeedQuery::for_filters(filters).compose();

        let posts: Vec<Post> = composed.query_as().fetch_all(&self.pool).await?;

        let meta = match posts.first() {
            Some(first) => calculate_metadata(first.total_records, filters.page, filters.page_size),
            None => MetaData::default(),
        };

        Ok((posts, meta))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Post, ModelError> {
        let composed = FeedQuery::for_post(id).compose();

        composed
            .query_as()
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ModelError::NotFound)
    }

    /// Inserts a post and returns its id. Title uniqueness is left to the store.
    pub async fn insert(&self, title: &str, url: &str, user_id: i64) -> Result<i64, ModelError> {
        let id = sqlx::query_scalar(
            r#"
            INSERT INTO posts (title, url, user_id)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(title)
        .bind(url)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_duplicate(&e, POSTS_TITLE_KEY) {
                ModelError::DuplicateTitle
            } else {
                ModelError::Store(e)
            }
        })?;

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(url: &str) -> Post {
        Post {
            id: 1,
            title: "t".to_string(),
            url: url.to_string(),
            created_at: Utc::now(),
            user_id: 1,
            username: None,
            comment_count: 0,
            votes: 0,
            total_records: 1,
        }
    }

    #[test]
    fn host_is_extracted() {
        assert_eq!(post("https://news.example.com/a?b=c").host(), "news.example.com");
        assert_eq!(post("not a url").host(), "");
    }

    #[test]
    fn create_request_requires_absolute_url() {
        let ok = CreatePostRequest {
            title: "Hello".to_string(),
            url: "https://example.com".to_string(),
        };
        assert!(ok.validate().is_ok());

        let relative = CreatePostRequest {
            title: "Hello".to_string(),
            url: "/just/a/path".to_string(),
        };
        assert!(relative.validate().is_err());

        let no_host = CreatePostRequest {
            title: "Hello".to_string(),
            url: "mailto:someone".to_string(),
        };
        assert!(no_host.validate().is_err());
    }

    #[test]
    fn create_request_limits_title() {
        let req = CreatePostRequest {
            title: "x".repeat(101),
            url: "https://example.com".to_string(),
        };
        assert!(req.validate().is_err());

        let empty = CreatePostRequest {
            title: String::new(),
            url: "https://example.com".to_string(),
        };
        assert!(empty.validate().is_err());
    }
}
