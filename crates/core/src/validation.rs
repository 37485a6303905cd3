//! Input validation utilities.
//!
//! Character-class checks shared by the intake forms and the search classifier. The checks are
//! deliberately ASCII-only, matching the backend's accepted alphabet for names and codes.

use crate::ValidationErrors;
use frontdesk_types::{NonEmptyText, TextError};
use once_cell::sync::Lazy;
use regex::Regex;

/// Basic `local@domain.tld` shape: no whitespace, one `@` boundary, a dot in the domain.
pub(crate) static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

pub fn is_letters(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_alphabetic())
}

pub fn is_letters_and_spaces(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_alphabetic() || b == b' ')
}

pub fn is_alphanumeric(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_alphanumeric())
}

pub fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

pub fn is_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Validates a required, length-capped text field and records the failure under `field`.
///
/// Returns the trimmed value when the field is acceptable so callers can run further
/// character-class checks on it.
pub(crate) fn required_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    label: &str,
    value: &str,
    max: usize,
) -> Option<String> {
    match NonEmptyText::bounded(value, max) {
        Ok(text) => Some(text.into_inner()),
        Err(TextError::Empty) => {
            errors.add(field, format!("{label} is required"));
            None
        }
        Err(TextError::TooLong { max }) => {
            errors.add(field, format!("{label} cannot be longer than {max} characters"));
            None
        }
    }
}

/// Trims an optional text field, mapping blank input to `None`.
pub(crate) fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
