//! Patient records and request models exchanged with the backend.
//!
//! Field names follow the backend's camelCase JSON (`firstname` and `lastname` are single
//! words there). Dates sent by the client are `YYYY-MM-DD`; dates received are kept as the
//! backend's strings and parsed on demand with [`parse_backend_date`], since the backend
//! returns both plain dates and full timestamps.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Parses the date part of a backend date or timestamp string.
pub fn parse_backend_date(value: &str) -> Option<NaiveDate> {
    let date_part = value.trim().get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// One row of the patient search result grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSearchResult {
    pub patient_id: i64,
    #[serde(default)]
    pub patient_code: String,
    pub firstname: String,
    #[serde(default)]
    pub middlename: Option<String>,
    pub lastname: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub phone_numbers_string: String,
    #[serde(default)]
    pub email_address: String,
    #[serde(default)]
    pub email_addresses_string: String,
    #[serde(default)]
    pub identity_number: String,
    #[serde(default)]
    pub identity_numbers_string: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfile {
    pub patient_id: i64,
    #[serde(default)]
    pub patient_code: String,
    pub firstname: String,
    #[serde(default)]
    pub middlename: Option<String>,
    pub lastname: String,
    #[serde(default)]
    pub gender_code: Option<String>,
    #[serde(default)]
    pub gender_name: String,
    #[serde(default)]
    pub date_of_birth: String,
}

impl PatientProfile {
    pub fn birth_date(&self) -> Option<NaiveDate> {
        parse_backend_date(&self.date_of_birth)
    }

    /// "First Middle Last" with the middle name omitted when blank.
    pub fn full_name(&self) -> String {
        [
            Some(self.firstname.as_str()),
            self.middlename.as_deref(),
            Some(self.lastname.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientIdentity {
    pub patient_identity_id: i64,
    pub patient_id: i64,
    pub identity_type_code: String,
    #[serde(default)]
    pub identity_type_name: Option<String>,
    pub identity_number: String,
    #[serde(default)]
    pub issued_by: String,
    #[serde(default)]
    pub place_issued: String,
    #[serde(default)]
    pub expiry: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientAddress {
    pub patient_address_id: i64,
    pub patient_id: i64,
    pub address_type_code: String,
    #[serde(default)]
    pub address_type_name: String,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub address_line3: Option<String>,
    pub city: String,
    pub pincode: String,
    pub state_code: String,
    #[serde(default)]
    pub state_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientPhone {
    pub patient_phone_id: i64,
    pub patient_id: i64,
    pub phone_number: String,
    pub phone_type_code: String,
    #[serde(default)]
    pub phone_type_name: String,
    #[serde(default)]
    pub listed_as: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientEmail {
    pub patient_email_id: i64,
    pub patient_id: i64,
    pub email_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientHealthVital {
    pub patient_health_vital_id: i64,
    pub patient_id: i64,
    #[serde(default)]
    pub health_vital_type_code: String,
    #[serde(default)]
    pub health_vital_value: String,
}

// ============================================================================
// REQUEST MODELS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertProfileRequest {
    pub firstname: String,
    pub middlename: String,
    pub lastname: String,
    pub gender_code: String,
    pub date_of_birth: Option<NaiveDate>,
    pub force_create: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub patient_id: i64,
    pub firstname: String,
    pub middlename: String,
    pub lastname: String,
    pub gender_code: String,
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertIdentityRequest {
    pub patient_id: i64,
    pub identity_type_code: String,
    pub identity_number: String,
    pub issued_by: String,
    pub place_issued: String,
    pub expiry: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIdentityRequest {
    pub patient_identity_id: i64,
    pub identity_type_code: String,
    pub identity_number: String,
    pub issued_by: String,
    pub place_issued: String,
    pub expiry: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAddressRequest {
    pub patient_id: i64,
    pub address_type_code: String,
    pub address_line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line3: Option<String>,
    pub city: String,
    pub pincode: String,
    pub state_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAddressRequest {
    pub patient_address_id: i64,
    pub address_type_code: String,
    pub address_line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line3: Option<String>,
    pub city: String,
    pub pincode: String,
    pub state_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertPhoneRequest {
    pub patient_id: i64,
    pub phone_number: String,
    pub phone_type_code: String,
    pub listed_as: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePhoneRequest {
    pub patient_phone_id: i64,
    pub phone_number: String,
    pub phone_type_code: String,
    pub listed_as: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertEmailRequest {
    pub patient_id: i64,
    pub email_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmailRequest {
    pub patient_email_id: i64,
    pub email_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertVitalRequest {
    pub patient_id: i64,
    pub health_vital_type_code: String,
    pub health_vital_value: String,
}
