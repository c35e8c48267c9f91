//! Headline validation.

use thiserror::Error;

/// Shortest headline accepted, in characters.
pub const MIN_HEADLINE_CHARS: usize = 5;
/// Longest headline accepted, in characters.
pub const MAX_HEADLINE_CHARS: usize = 500;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeadlineError {
    #[error("Headline is empty")]
    Empty,

    #[error("Headline too short: {len} characters (minimum {min})")]
    TooShort { min: usize, len: usize },

    #[error("Headline too long: {len} characters (maximum {max})")]
    TooLong { max: usize, len: usize },
}

/// Validate a headline and return it trimmed.
///
/// Length is counted in characters, not bytes, after trimming.
pub fn validate_headline(raw: &str) -> Result<&str, HeadlineError> {
    let headline = raw.trim();
    let len = headline.chars().count();

    if len == 0 {
        return Err(HeadlineError::Empty);
    }
    if len < MIN_HEADLINE_CHARS {
        return Err(HeadlineError::TooShort {
            min: MIN_HEADLINE_CHARS,
            len,
        });
    }
    if len > MAX_HEADLINE_CHARS {
        return Err(HeadlineError::TooLong {
            max: MAX_HEADLINE_CHARS,
            len,
        });
    }

    Ok(headline)
}
