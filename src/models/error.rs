use thiserror::Error;

/// Errors returned by the model layer.
///
/// Validation and conflict variants are expected outcomes the caller turns
/// into user-facing messages; `Store` is a genuine fault and is passed
/// through unchanged.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Invalid page range")]
    InvalidPageRange,

    #[error("Invalid page size")]
    InvalidPageSize,

    #[error("You have already voted for this post")]
    DuplicateVote,

    #[error("Post with same title already exists")]
    DuplicateTitle,

    #[error("Email already exists")]
    DuplicateEmail,

    #[error("No record found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] sqlx::Error),
}
