//! The patient currently open at the front desk.
//!
//! [`CurrentPatient`] mirrors the backend records the intake steps prefill from and save
//! into. It is filled either by [`load_patient`] when a search result is selected or by the
//! steps themselves as a new patient is registered.

use crate::backend::PatientApi;
use crate::constants::{PHONE_TYPE_HOME, PHONE_TYPE_MOBILE, PHONE_TYPE_OTHER};
use crate::models::{
    PatientAddress, PatientEmail, PatientHealthVital, PatientIdentity, PatientPhone,
    PatientProfile,
};
use crate::BackendResult;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentPatient {
    pub profile: Option<PatientProfile>,
    pub identity: Option<PatientIdentity>,
    pub address: Option<PatientAddress>,
    pub phones: Vec<PatientPhone>,
    pub email: Option<PatientEmail>,
    pub vitals: Vec<PatientHealthVital>,
}

impl CurrentPatient {
    /// Identifier of the saved profile. Unsaved or zero ids count as no patient.
    pub fn patient_id(&self) -> Option<i64> {
        self.profile
            .as_ref()
            .map(|profile| profile.patient_id)
            .filter(|id| *id > 0)
    }

    pub fn set_profile(&mut self, profile: PatientProfile) {
        self.profile = Some(profile);
    }

    pub fn set_identity(&mut self, identity: PatientIdentity) {
        self.identity = Some(identity);
    }

    pub fn set_address(&mut self, address: PatientAddress) {
        self.address = Some(address);
    }

    /// Stores a phone, replacing the one already recorded for the same type.
    pub fn set_phone(&mut self, phone: PatientPhone) {
        match self
            .phones
            .iter_mut()
            .find(|existing| existing.phone_type_code == phone.phone_type_code)
        {
            Some(existing) => *existing = phone,
            None => self.phones.push(phone),
        }
    }

    pub fn set_email(&mut self, email: PatientEmail) {
        self.email = Some(email);
    }

    pub fn add_vital(&mut self, vital: PatientHealthVital) {
        self.vitals.push(vital);
    }

    pub fn phone_of_type(&self, type_code: &str) -> Option<&PatientPhone> {
        self.phones
            .iter()
            .find(|phone| phone.phone_type_code.eq_ignore_ascii_case(type_code))
    }

    pub fn mobile_phone(&self) -> Option<&PatientPhone> {
        self.phone_of_type(PHONE_TYPE_MOBILE)
    }

    pub fn home_phone(&self) -> Option<&PatientPhone> {
        self.phone_of_type(PHONE_TYPE_HOME)
    }

    pub fn other_phone(&self) -> Option<&PatientPhone> {
        self.phone_of_type(PHONE_TYPE_OTHER)
    }

    /// Forgets everything, as on logout or when starting a new registration.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Loads a patient's profile, identities, addresses, phones and emails concurrently.
///
/// Only the most recent identity, address and email (highest id) are kept; every phone is
/// kept. Any failed read fails the whole load.
///
/// # Errors
///
/// Returns the first backend error among the five reads.
pub async fn load_patient(api: &dyn PatientApi, patient_id: i64) -> BackendResult<CurrentPatient> {
    let (profile, identities, addresses, phones, emails) = futures::try_join!(
        api.patient_profile(patient_id),
        api.patient_identities(patient_id),
        api.patient_addresses(patient_id),
        api.patient_phones(patient_id),
        api.patient_emails(patient_id),
    )?;

    tracing::debug!(
        "loaded patient {patient_id}: {} identities, {} addresses, {} phones, {} emails",
        identities.len(),
        addresses.len(),
        phones.len(),
        emails.len()
    );

    Ok(CurrentPatient {
        profile: Some(profile),
        identity: identities
            .into_iter()
            .max_by_key(|identity| identity.patient_identity_id),
        address: addresses
            .into_iter()
            .max_by_key(|address| address.patient_address_id),
        phones,
        email: emails.into_iter().max_by_key(|email| email.patient_email_id),
        vitals: Vec::new(),
    })
}
