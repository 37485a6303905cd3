//! Free-text search keyword classification.
//!
//! The basic patient search takes one line of text such as `john doe 9876543210` and tags each
//! whitespace-separated token with the search field it most likely belongs to. Structured
//! shapes are tried first, in this order:
//!
//! 1. `YYYY-MM-DD` → date of birth
//! 2. ten digits → phone number
//! 3. `#` followed by letters/digits → identity number (every `#` removed)
//! 4. `local@domain.tld` → email address
//!
//! Anything else is a name: the first such token is the first name and every later one is
//! appended to the last name. At most one keyword exists per type; a later structured token
//! replaces the value of the earlier one in place.
//!
//! Classification is a pure function of the input string. Callers rebuild the keyword list
//! from scratch whenever the text changes.

use crate::validation::EMAIL_PATTERN;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static DATE_OF_BIRTH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern is valid"));

static PHONE_NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("phone pattern is valid"));

static IDENTITY_NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#[a-zA-Z0-9]+").expect("identity pattern is valid"));

/// Search field a keyword was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeywordType {
    FirstName,
    LastName,
    PhoneNumber,
    IdentityNumber,
    EmailAddress,
    DateOfBirth,
}

impl KeywordType {
    /// Label shown next to an identified keyword.
    pub fn label(self) -> &'static str {
        match self {
            KeywordType::FirstName => "First name",
            KeywordType::LastName => "Last name",
            KeywordType::PhoneNumber => "Phone number",
            KeywordType::IdentityNumber => "Identity number",
            KeywordType::EmailAddress => "Email address",
            KeywordType::DateOfBirth => "Date of birth",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchKeyword {
    pub kind: KeywordType,
    pub value: String,
}

impl SearchKeyword {
    pub fn new(kind: KeywordType, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Classifies a raw search string into ordered, de-duplicated keywords.
///
/// Order is the order in which each type was first seen. Empty or whitespace-only input
/// yields an empty list.
pub fn classify(raw: &str) -> Vec<SearchKeyword> {
    let mut keywords = Vec::new();

    for token in raw.split_whitespace() {
        if DATE_OF_BIRTH_PATTERN.is_match(token) {
            replace_or_add(&mut keywords, KeywordType::DateOfBirth, token.to_string());
        } else if PHONE_NUMBER_PATTERN.is_match(token) {
            replace_or_add(&mut keywords, KeywordType::PhoneNumber, token.to_string());
        } else if IDENTITY_NUMBER_PATTERN.is_match(token) {
            replace_or_add(
                &mut keywords,
                KeywordType::IdentityNumber,
                token.replace('#', ""),
            );
        } else if EMAIL_PATTERN.is_match(token) {
            replace_or_add(&mut keywords, KeywordType::EmailAddress, token.to_string());
        } else if !keywords.iter().any(|k| k.kind == KeywordType::FirstName) {
            keywords.push(SearchKeyword::new(KeywordType::FirstName, token));
        } else {
            append_to_last_name(&mut keywords, token);
        }
    }

    keywords
}

fn replace_or_add(keywords: &mut Vec<SearchKeyword>, kind: KeywordType, value: String) {
    match keywords.iter_mut().find(|k| k.kind == kind) {
        Some(existing) => existing.value = value,
        None => keywords.push(SearchKeyword { kind, value }),
    }
}

fn append_to_last_name(keywords: &mut Vec<SearchKeyword>, token: &str) {
    match keywords
        .iter_mut()
        .find(|k| k.kind == KeywordType::LastName)
    {
        Some(existing) => {
            existing.value.push(' ');
            existing.value.push_str(token);
        }
        None => keywords.push(SearchKeyword::new(KeywordType::LastName, token)),
    }
}
