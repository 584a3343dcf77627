//! Review read model and the front-end content rule.
//!
//! The content rule is applied by adapters (HTML form, CLI) before they call
//! the store; the store itself accepts any content for an existing speech.

use super::speech::SpeechId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ReviewId = i64;

/// Longest review content adapters accept, in characters.
pub const MAX_REVIEW_CONTENT_CHARS: usize = 400;

/// Review joined with the title of the speech it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub review_id: ReviewId,
    pub content: String,
    pub speech_id: SpeechId,
    pub speech_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewContentError {
    Empty,
    TooLong { chars: usize, max: usize },
}

impl Display for ReviewContentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "review content must not be empty"),
            Self::TooLong { max, .. } => {
                write!(f, "reviews must not be longer than {max} characters")
            }
        }
    }
}

impl Error for ReviewContentError {}

/// Applies the review form rule: non-blank and at most
/// [`MAX_REVIEW_CONTENT_CHARS`] characters.
///
/// Returns the content unchanged on success.
pub fn validate_review_content(content: &str) -> Result<&str, ReviewContentError> {
    if content.trim().is_empty() {
        return Err(ReviewContentError::Empty);
    }

    let chars = content.chars().count();
    if chars > MAX_REVIEW_CONTENT_CHARS {
        return Err(ReviewContentError::TooLong {
            chars,
            max: MAX_REVIEW_CONTENT_CHARS,
        });
    }

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::{validate_review_content, ReviewContentError, MAX_REVIEW_CONTENT_CHARS};

    #[test]
    fn accepts_content_at_the_limit() {
        let content = "a".repeat(MAX_REVIEW_CONTENT_CHARS);
        assert_eq!(validate_review_content(&content), Ok(content.as_str()));
    }

    #[test]
    fn rejects_blank_and_oversized_content() {
        assert_eq!(validate_review_content("   "), Err(ReviewContentError::Empty));

        let content = "a".repeat(MAX_REVIEW_CONTENT_CHARS + 1);
        assert_eq!(
            validate_review_content(&content),
            Err(ReviewContentError::TooLong {
                chars: MAX_REVIEW_CONTENT_CHARS + 1,
                max: MAX_REVIEW_CONTENT_CHARS,
            })
        );
    }

    #[test]
    fn counts_characters_not_bytes() {
        let content = "é".repeat(MAX_REVIEW_CONTENT_CHARS);
        assert!(content.len() > MAX_REVIEW_CONTENT_CHARS);
        assert!(validate_review_content(&content).is_ok());
    }
}
