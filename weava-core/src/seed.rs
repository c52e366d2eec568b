//! Story seed validation.
//!
//! A seed is the reader's own idea for a story, a couple of sentences at
//! most. Validation is the only way to obtain a [`StorySeed`], so anything
//! downstream of this module can rely on the length bounds holding.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum seed length after trimming, in characters.
pub const MIN_SEED_CHARS: usize = 10;
/// Maximum seed length after trimming, in characters.
pub const MAX_SEED_CHARS: usize = 500;

const TOO_SHORT: &str = "Your idea is too short! Tell us more.";
const TOO_LONG: &str = "That's a bit long! Try to be more concise.";

/// A validated, trimmed story seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorySeed(String);

impl StorySeed {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for StorySeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One field-level validation failure, phrased for display in a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Outcome of validating user input, consumed by matching on the two arms.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Validated<T> {
    Valid(T),
    Invalid(Vec<FieldError>),
}

impl<T> Validated<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validated::Valid(_))
    }

    pub fn into_result(self) -> Result<T, Vec<FieldError>> {
        match self {
            Validated::Valid(value) => Ok(value),
            Validated::Invalid(errors) => Err(errors),
        }
    }
}

/// Validate raw form input into a [`StorySeed`].
///
/// The input is trimmed first; the length bounds apply to what remains.
pub fn validate_seed(input: &str) -> Validated<StorySeed> {
    let trimmed = input.trim();
    let length = trimmed.chars().count();

    if length < MIN_SEED_CHARS {
        return Validated::Invalid(vec![FieldError::new("seed", TOO_SHORT)]);
    }
    if length > MAX_SEED_CHARS {
        return Validated::Invalid(vec![FieldError::new("seed", TOO_LONG)]);
    }
    Validated::Valid(StorySeed(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_reasonable_seed() {
        let seed = validate_seed("A lighthouse keeper who talks to storms")
            .into_result()
            .unwrap();
        assert_eq!(seed.as_str(), "A lighthouse keeper who talks to storms");
    }

    #[test]
    fn test_trims_before_validating() {
        let seed = validate_seed("   a story about rust   ").into_result().unwrap();
        assert_eq!(seed.as_str(), "a story about rust");
    }

    #[test]
    fn test_minimum_boundary() {
        // Nine characters fails, ten passes.
        assert!(!validate_seed("123456789").is_valid());
        assert!(validate_seed("1234567890").is_valid());
    }

    #[test]
    fn test_maximum_boundary() {
        let at_limit = "a".repeat(MAX_SEED_CHARS);
        assert!(validate_seed(&at_limit).is_valid());

        let over_limit = "a".repeat(MAX_SEED_CHARS + 1);
        let errors = validate_seed(&over_limit).into_result().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "seed");
        assert_eq!(errors[0].message, "That's a bit long! Try to be more concise.");
    }

    #[test]
    fn test_whitespace_only_is_too_short() {
        let errors = validate_seed("          ").into_result().unwrap_err();
        assert_eq!(errors[0].message, "Your idea is too short! Tell us more.");
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // Nine two-byte characters: 18 bytes, but still under the minimum.
        assert!(!validate_seed("ééééééééé").is_valid());
        assert!(validate_seed("éééééééééé").is_valid());
    }
}
