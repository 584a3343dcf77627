//! Write-path validation shared by the store operations.

use super::catalog::EntityKind;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Input rejected before anything is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Speaker or topic name is empty or whitespace only.
    BlankName(EntityKind),
    /// Speech title is empty or whitespace only.
    BlankTitle,
    /// Speech duration in seconds is below zero.
    NegativeDuration(i64),
    /// Speech view count is below zero.
    NegativeViews(i64),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName(kind) => write!(f, "{kind} name must not be blank"),
            Self::BlankTitle => write!(f, "speech title must not be blank"),
            Self::NegativeDuration(value) => {
                write!(f, "speech duration must not be negative, got {value}")
            }
            Self::NegativeViews(value) => {
                write!(f, "speech views must not be negative, got {value}")
            }
        }
    }
}

impl Error for ValidationError {}

/// Rejects blank speaker/topic names. Names are otherwise stored verbatim.
pub fn validate_name(kind: EntityKind, name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::BlankName(kind));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_name, ValidationError};
    use crate::model::catalog::EntityKind;

    #[test]
    fn validate_name_rejects_whitespace_only() {
        assert_eq!(
            validate_name(EntityKind::Topic, " \t"),
            Err(ValidationError::BlankName(EntityKind::Topic))
        );
    }

    #[test]
    fn validate_name_keeps_surrounding_spaces_legal() {
        assert!(validate_name(EntityKind::Speaker, " Jane Doe ").is_ok());
    }
}
