//! Backend collaborator contracts.
//!
//! The core never talks HTTP itself. Steps, the search session and patient selection depend on
//! these traits; `frontdesk-client` implements them over REST and tests use an in-memory fake.

use crate::auth::Credentials;
use crate::criteria::PatientSearchCriteria;
use crate::master::{AddressType, Gender, HealthVital, IdentityType, Language, PhoneType};
use crate::models::{
    PatientAddress, PatientEmail, PatientIdentity, PatientPhone, PatientProfile,
    PatientSearchResult,
};
use crate::upsert::{EntityRecord, EntityRequest};
use crate::BackendResult;
use async_trait::async_trait;

/// Patient search, reads and saves.
#[async_trait]
pub trait PatientApi: Send + Sync {
    async fn search_patients(
        &self,
        criteria: &PatientSearchCriteria,
    ) -> BackendResult<Vec<PatientSearchResult>>;

    /// Inserts or updates one entity and returns the record the backend stored.
    ///
    /// A status other than 201 for an insert or 202 for an update is an error.
    async fn upsert(&self, request: &EntityRequest) -> BackendResult<EntityRecord>;

    async fn patient_profile(&self, patient_id: i64) -> BackendResult<PatientProfile>;

    async fn patient_identities(&self, patient_id: i64) -> BackendResult<Vec<PatientIdentity>>;

    async fn patient_addresses(&self, patient_id: i64) -> BackendResult<Vec<PatientAddress>>;

    async fn patient_phones(&self, patient_id: i64) -> BackendResult<Vec<PatientPhone>>;

    async fn patient_emails(&self, patient_id: i64) -> BackendResult<Vec<PatientEmail>>;
}

/// Code lists served by `/api/master`.
#[async_trait]
pub trait MasterDataApi: Send + Sync {
    async fn languages(&self) -> BackendResult<Vec<Language>>;

    async fn genders(&self) -> BackendResult<Vec<Gender>>;

    async fn identity_types(&self) -> BackendResult<Vec<IdentityType>>;

    async fn address_types(&self) -> BackendResult<Vec<AddressType>>;

    async fn phone_types(&self) -> BackendResult<Vec<PhoneType>>;

    async fn health_vitals(&self) -> BackendResult<Vec<HealthVital>>;
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Returns the bearer token, or `None` when the backend rejects the credentials.
    async fn login(&self, credentials: &Credentials) -> BackendResult<Option<String>>;

    /// Forgets the session token.
    async fn logout(&self);
}
