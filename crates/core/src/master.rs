//! Master data: the code lists behind the intake form drop-downs.
//!
//! Everything except states is served by `GET /api/master/<kind>`. States come from a fixed
//! local list; the backend has no endpoint for them yet.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub language_id: i64,
    pub language_code: String,
    pub language_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gender {
    pub gender_id: i64,
    pub gender_code: String,
    pub gender_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityType {
    pub identity_type_id: i64,
    pub identity_type_code: String,
    pub identity_type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressType {
    pub address_type_id: i64,
    pub address_type_code: String,
    pub address_type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneType {
    pub phone_type_id: i64,
    pub phone_type_code: String,
    pub phone_type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub state_id: i64,
    pub state_code: String,
    pub state_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthVital {
    pub health_vital_id: i64,
    pub health_vital_code: String,
    pub health_vital_name: String,
    #[serde(default)]
    pub health_vital_unit: String,
}

/// Master-data list served by the backend, named by its path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MasterDataKind {
    Languages,
    Genders,
    IdentityTypes,
    AddressTypes,
    PhoneTypes,
    HealthVitals,
}

impl MasterDataKind {
    pub const ALL: [MasterDataKind; 6] = [
        MasterDataKind::Languages,
        MasterDataKind::Genders,
        MasterDataKind::IdentityTypes,
        MasterDataKind::AddressTypes,
        MasterDataKind::PhoneTypes,
        MasterDataKind::HealthVitals,
    ];

    pub fn path_segment(self) -> &'static str {
        match self {
            MasterDataKind::Languages => "languages",
            MasterDataKind::Genders => "genders",
            MasterDataKind::IdentityTypes => "identitytypes",
            MasterDataKind::AddressTypes => "addresstypes",
            MasterDataKind::PhoneTypes => "phonetypes",
            MasterDataKind::HealthVitals => "healthvitals",
        }
    }
}

const STATES: [(&str, &str); 28] = [
    ("AP", "Andhra Pradesh"),
    ("AR", "Arunachal Pradesh"),
    ("AS", "Assam"),
    ("BR", "Bihar"),
    ("CG", "Chhattisgarh"),
    ("GA", "Goa"),
    ("GJ", "Gujarat"),
    ("HR", "Haryana"),
    ("HP", "Himachal Pradesh"),
    ("JH", "Jharkhand"),
    ("KA", "Karnataka"),
    ("KL", "Kerala"),
    ("MP", "Madhya Pradesh"),
    ("MH", "Maharashtra"),
    ("MN", "Manipur"),
    ("ML", "Meghalaya"),
    ("MZ", "Mizoram"),
    ("NL", "Nagaland"),
    ("OD", "Odisha"),
    ("PB", "Punjab"),
    ("RJ", "Rajasthan"),
    ("SK", "Sikkim"),
    ("TN", "Tamil Nadu"),
    ("TS", "Telangana"),
    ("TR", "Tripura"),
    ("UP", "Uttar Pradesh"),
    ("UK", "Uttarakhand"),
    ("WB", "West Bengal"),
];

/// The fixed state list used by the address step, ids numbered from 1.
pub fn states() -> Vec<State> {
    STATES
        .iter()
        .zip(1..)
        .map(|((code, name), id)| State {
            state_id: id,
            state_code: (*code).to_string(),
            state_name: (*name).to_string(),
        })
        .collect()
}

/// Looks up a state's display name by code.
pub fn state_name(code: &str) -> Option<&'static str> {
    STATES
        .iter()
        .find(|(state_code, _)| state_code.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
}
