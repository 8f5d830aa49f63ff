// src/handlers/mod.rs

pub mod auth;
pub mod community;
pub mod interaction;

use crate::error::AppError;

/// Trims user-entered text and rejects it when nothing is left.
///
/// Text is stored as typed; escaping belongs to whatever renders it.
pub(crate) fn required_text<'a>(raw: &'a str, field: &str) -> Result<&'a str, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::comment::CreateCommentRequest;
    use validator::Validate;

    #[test]
    fn blank_text_is_rejected() {
        assert!(matches!(
            required_text("   \n", "comment"),
            Err(AppError::BadRequest(msg)) if msg == "comment is required"
        ));
    }

    #[test]
    fn text_is_trimmed_but_not_escaped() {
        assert_eq!(required_text("  AT&T <3  ", "title").unwrap(), "AT&T <3");
    }

    #[test]
    fn comment_of_ampersands_at_the_limit_is_accepted() {
        let payload = CreateCommentRequest {
            body: "&".repeat(1000),
        };
        assert!(payload.validate().is_ok());

        let body = required_text(&payload.body, "comment").unwrap();
        assert_eq!(body.chars().count(), 1000);
    }
}
