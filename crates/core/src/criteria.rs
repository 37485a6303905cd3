//! Patient search criteria.
//!
//! Criteria are built either by folding classified keywords from the basic search box or
//! from the separate fields of the advanced search form.

use crate::models::parse_backend_date;
use crate::search::{KeywordType, SearchKeyword};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/patients/search`. Absent fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSearchCriteria {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
}

impl PatientSearchCriteria {
    /// Folds classified keywords into criteria.
    ///
    /// A date-shaped keyword that is not a real calendar date (for example `2024-13-45`) is
    /// dropped rather than sent.
    pub fn from_keywords(keywords: &[SearchKeyword]) -> Self {
        let mut criteria = Self::default();
        for keyword in keywords {
            let value = Some(keyword.value.clone());
            match keyword.kind {
                KeywordType::FirstName => criteria.first_name = value,
                KeywordType::LastName => criteria.last_name = value,
                KeywordType::PhoneNumber => criteria.phone_number = value,
                KeywordType::IdentityNumber => criteria.identity_number = value,
                KeywordType::EmailAddress => criteria.email = value,
                KeywordType::DateOfBirth => match parse_backend_date(&keyword.value) {
                    Some(date) => criteria.date_of_birth = Some(date),
                    None => tracing::debug!(
                        "ignoring date-shaped keyword that is not a calendar date: {}",
                        keyword.value
                    ),
                },
            }
        }
        criteria
    }

    /// True when at least one criterion carries a non-blank value.
    pub fn has_any_value(&self) -> bool {
        let texts = [
            &self.first_name,
            &self.last_name,
            &self.phone_number,
            &self.identity_number,
            &self.email,
        ];
        self.date_of_birth.is_some()
            || texts
                .iter()
                .any(|value| value.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }
}

/// Field values of the advanced search form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvancedSearchForm {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: String,
    pub identity_number: String,
    pub email_address: String,
}

impl AdvancedSearchForm {
    /// Builds criteria from the non-blank fields.
    pub fn to_criteria(&self) -> PatientSearchCriteria {
        fn non_blank(value: &str) -> Option<String> {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }

        PatientSearchCriteria {
            first_name: non_blank(&self.first_name),
            last_name: non_blank(&self.last_name),
            phone_number: non_blank(&self.phone_number),
            identity_number: non_blank(&self.identity_number),
            email: non_blank(&self.email_address),
            date_of_birth: self.date_of_birth,
        }
    }
}
