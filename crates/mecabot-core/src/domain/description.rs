//! Intake validation for problem descriptions.
//!
//! The resolver accepts any string; callers validate first.

use super::error::ValidationError;

/// Minimum accepted length, in characters
pub const MIN_DESCRIPTION_CHARS: usize = 10;
/// Maximum accepted length, in characters
pub const MAX_DESCRIPTION_CHARS: usize = 2000;

/// A customer's free-text problem description that passed intake checks:
/// not blank, and between 10 and 2000 characters long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemDescription(String);

impl ProblemDescription {
    pub fn parse(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ValidationError::Blank);
        }
        let chars = raw.chars().count();
        if !(MIN_DESCRIPTION_CHARS..=MAX_DESCRIPTION_CHARS).contains(&chars) {
            return Err(ValidationError::Length { chars });
        }
        Ok(ProblemDescription(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ProblemDescription {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
