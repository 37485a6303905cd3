//! Constants used throughout the front desk core crate.
//!
//! This module contains the REST paths of the patient backend and the fixed limits of the
//! intake forms so the client and the core agree on one contract.

/// Search endpoint; body is a `PatientSearchCriteria`.
pub const PATIENT_SEARCH_PATH: &str = "/api/patients/search";

/// Profile collection; `POST` inserts, `PUT` updates, `GET {id}` reads.
pub const PATIENTS_PATH: &str = "/api/patients";

/// Identity collection.
pub const IDENTITIES_PATH: &str = "/api/patients/identities";

/// Address collection.
pub const ADDRESSES_PATH: &str = "/api/patients/addresses";

/// Phone collection.
pub const PHONES_PATH: &str = "/api/patients/phones";

/// Email collection.
pub const EMAILS_PATH: &str = "/api/patients/emails";

/// Health-vital collection (insert only).
pub const VITALS_PATH: &str = "/api/patients/vitals";

/// Login endpoint. A 401 from here is a credential failure, never a refresh trigger.
pub const LOGIN_PATH: &str = "/api/users/login";

/// Cookie-credentialed token refresh endpoint.
pub const REFRESH_TOKEN_PATH: &str = "/api/users/refreshtoken";

/// Prefix of the master-data endpoints.
pub const MASTER_DATA_PATH: &str = "/api/master";

/// Search results shown per page.
pub const SEARCH_PAGE_SIZE: usize = 10;

/// Maximum length of names, identity fields and address lines.
pub const MAX_TEXT_LEN: usize = 100;

/// Maximum length of a pincode.
pub const MAX_PINCODE_LEN: usize = 10;

/// Maximum length of a home or other phone number.
pub const MAX_PHONE_LEN: usize = 15;

/// Phone type code of the mobile number.
pub const PHONE_TYPE_MOBILE: &str = "MOBILE";

/// Phone type code of the home number.
pub const PHONE_TYPE_HOME: &str = "HOME";

/// Phone type code of any other number.
pub const PHONE_TYPE_OTHER: &str = "OTHER";
