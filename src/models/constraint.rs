//! Classification of store errors against named uniqueness constraints.
//!
//! The constraint names below are part of the schema contract: the
//! migrations declare them explicitly and renaming one there requires
//! renaming it here.

use sqlx::error::ErrorKind;

/// Composite primary key on `votes (post_id, user_id)`.
pub const VOTES_PKEY: &str = "votes_pkey";

/// Unique title on `posts`.
pub const POSTS_TITLE_KEY: &str = "posts_title_key";

/// Unique email on `users`.
pub const USERS_EMAIL_KEY: &str = "users_email_key";

/// Returns true when `err` is a unique violation of `constraint`.
pub fn is_duplicate(err: &sqlx::Error, constraint: &str) -> bool {
    match err.as_database_error() {
        Some(db) => violates(db.kind(), db.constraint(), db.message(), constraint),
        None => false,
    }
}

/// Prefers the constraint name reported by the driver; the message match
/// is only consulted when the driver did not report one.
fn violates(kind: ErrorKind, reported: Option<&str>, message: &str, constraint: &str) -> bool {
    if !matches!(kind, ErrorKind::UniqueViolation) {
        return false;
    }

    match reported {
        Some(name) => name == constraint,
        None => message.contains(&format!(
            "duplicate key value violates unique constraint \"{}\"",
            constraint
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_reported_constraint_name() {
        assert!(violates(
            ErrorKind::UniqueViolation,
            Some(VOTES_PKEY),
            "",
            VOTES_PKEY
        ));
    }

    #[test]
    fn rejects_other_constraint() {
        assert!(!violates(
            ErrorKind::UniqueViolation,
            Some(POSTS_TITLE_KEY),
            "",
            VOTES_PKEY
        ));
    }

    #[test]
    fn rejects_non_unique_violations() {
        assert!(!violates(
            ErrorKind::ForeignKeyViolation,
            Some(VOTES_PKEY),
            "",
            VOTES_PKEY
        ));
    }

    #[test]
    fn falls_back_to_message_without_reported_name() {
        let message = r#"duplicate key value violates unique constraint "votes_pkey""#;
        assert!(violates(ErrorKind::UniqueViolation, None, message, VOTES_PKEY));
        assert!(!violates(
            ErrorKind::UniqueViolation,
            None,
            message,
            POSTS_TITLE_KEY
        ));
    }

    #[test]
    fn non_database_errors_are_not_duplicates() {
        assert!(!is_duplicate(&sqlx::Error::RowNotFound, VOTES_PKEY));
        assert!(!is_duplicate(&sqlx::Error::PoolTimedOut, VOTES_PKEY));
    }
}
