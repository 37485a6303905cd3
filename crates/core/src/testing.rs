//! In-memory backend for unit tests.

use crate::backend::PatientApi;
use crate::criteria::PatientSearchCriteria;
use crate::models::*;
use crate::upsert::{EntityRecord, EntityRequest, Upsert};
use crate::{BackendError, BackendResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

type FailWhen = Box<dyn Fn(&EntityRequest) -> bool + Send + Sync>;

#[derive(Default)]
struct FakeState {
    next_id: i64,
    requests: Vec<EntityRequest>,
    searches: Vec<PatientSearchCriteria>,
    search_results: Vec<PatientSearchResult>,
    search_fails: bool,
    patients: HashMap<i64, SeededPatient>,
}

#[derive(Clone)]
struct SeededPatient {
    profile: PatientProfile,
    identities: Vec<PatientIdentity>,
    addresses: Vec<PatientAddress>,
    phones: Vec<PatientPhone>,
    emails: Vec<PatientEmail>,
}

/// Echoes every save back as a stored record with a fresh id, unless told to fail it.
pub(crate) struct FakeBackend {
    state: Mutex<FakeState>,
    fail_when: Mutex<Option<FailWhen>>,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                next_id: 100,
                ..FakeState::default()
            }),
            fail_when: Mutex::new(None),
        }
    }

    pub(crate) fn fail_when(&self, predicate: impl Fn(&EntityRequest) -> bool + Send + Sync + 'static) {
        *self.fail_when.lock().unwrap() = Some(Box::new(predicate));
    }

    pub(crate) fn succeed_always(&self) {
        *self.fail_when.lock().unwrap() = None;
    }

    pub(crate) fn requests(&self) -> Vec<EntityRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub(crate) fn searches(&self) -> Vec<PatientSearchCriteria> {
        self.state.lock().unwrap().searches.clone()
    }

    pub(crate) fn set_search_results(&self, results: Vec<PatientSearchResult>) {
        self.state.lock().unwrap().search_results = results;
    }

    pub(crate) fn fail_searches(&self) {
        self.state.lock().unwrap().search_fails = true;
    }

    /// Seeds patient `id` with two identities, addresses and emails each (ids `11/12`,
    /// `21/22`, `31/32`, stored out of order) and a mobile and home phone.
    pub(crate) fn seed_patient(&self, id: i64) {
        let seeded = SeededPatient {
            profile: profile(id),
            identities: vec![identity(id, 12), identity(id, 11)],
            addresses: vec![address(id, 22), address(id, 21)],
            phones: vec![
                PatientPhone {
                    patient_id: id,
                    ..phone(41, "MOBILE", "9876543210")
                },
                PatientPhone {
                    patient_id: id,
                    ..phone(42, "HOME", "0801234567")
                },
            ],
            emails: vec![email(id, 31), email(id, 32)],
        };
        self.state.lock().unwrap().patients.insert(id, seeded);
    }

    fn seeded(&self, id: i64, path: &str) -> BackendResult<SeededPatient> {
        self.state
            .lock()
            .unwrap()
            .patients
            .get(&id)
            .cloned()
            .ok_or_else(|| BackendError::UnexpectedStatus {
                path: format!("{path}/{id}"),
                expected: 200,
                actual: 404,
            })
    }

    fn echo(&self, request: &EntityRequest) -> EntityRecord {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let fresh = state.next_id;

        match request {
            EntityRequest::Profile(upsert) => {
                let (patient_id, firstname, middlename, lastname, gender_code, dob) = match upsert
                {
                    Upsert::Insert(r) => (
                        fresh,
                        &r.firstname,
                        &r.middlename,
                        &r.lastname,
                        &r.gender_code,
                        r.date_of_birth,
                    ),
                    Upsert::Update(r) => (
                        r.patient_id,
                        &r.firstname,
                        &r.middlename,
                        &r.lastname,
                        &r.gender_code,
                        r.date_of_birth,
                    ),
                };
                EntityRecord::Profile(PatientProfile {
                    patient_id,
                    patient_code: format!("P{patient_id:06}"),
                    firstname: firstname.clone(),
                    middlename: Some(middlename.clone()),
                    lastname: lastname.clone(),
                    gender_code: Some(gender_code.clone()),
                    gender_name: String::new(),
                    date_of_birth: dob.map(|d| d.to_string()).unwrap_or_default(),
                })
            }
            EntityRequest::Identity(upsert) => EntityRecord::Identity(match upsert {
                Upsert::Insert(r) => PatientIdentity {
                    patient_identity_id: fresh,
                    patient_id: r.patient_id,
                    identity_type_code: r.identity_type_code.clone(),
                    identity_type_name: None,
                    identity_number: r.identity_number.clone(),
                    issued_by: r.issued_by.clone(),
                    place_issued: r.place_issued.clone(),
                    expiry: r.expiry.map(|d| d.to_string()),
                },
                Upsert::Update(r) => PatientIdentity {
                    patient_identity_id: r.patient_identity_id,
                    patient_id: 0,
                    identity_type_code: r.identity_type_code.clone(),
                    identity_type_name: None,
                    identity_number: r.identity_number.clone(),
                    issued_by: r.issued_by.clone(),
                    place_issued: r.place_issued.clone(),
                    expiry: r.expiry.map(|d| d.to_string()),
                },
            }),
            EntityRequest::Address(upsert) => EntityRecord::Address(match upsert {
                Upsert::Insert(r) => PatientAddress {
                    patient_address_id: fresh,
                    patient_id: r.patient_id,
                    address_type_code: r.address_type_code.clone(),
                    address_type_name: String::new(),
                    address_line1: r.address_line1.clone(),
                    address_line2: r.address_line2.clone(),
                    address_line3: r.address_line3.clone(),
                    city: r.city.clone(),
                    pincode: r.pincode.clone(),
                    state_code: r.state_code.clone(),
                    state_name: String::new(),
                },
                Upsert::Update(r) => PatientAddress {
                    patient_address_id: r.patient_address_id,
                    patient_id: 0,
                    address_type_code: r.address_type_code.clone(),
                    address_type_name: String::new(),
                    address_line1: r.address_line1.clone(),
                    address_line2: r.address_line2.clone(),
                    address_line3: r.address_line3.clone(),
                    city: r.city.clone(),
                    pincode: r.pincode.clone(),
                    state_code: r.state_code.clone(),
                    state_name: String::new(),
                },
            }),
            EntityRequest::Phone(upsert) => EntityRecord::Phone(match upsert {
                Upsert::Insert(r) => PatientPhone {
                    patient_phone_id: fresh,
                    patient_id: r.patient_id,
                    phone_number: r.phone_number.clone(),
                    phone_type_code: r.phone_type_code.clone(),
                    phone_type_name: String::new(),
                    listed_as: r.listed_as.clone(),
                },
                Upsert::Update(r) => PatientPhone {
                    patient_phone_id: r.patient_phone_id,
                    patient_id: 0,
                    phone_number: r.phone_number.clone(),
                    phone_type_code: r.phone_type_code.clone(),
                    phone_type_name: String::new(),
                    listed_as: r.listed_as.clone(),
                },
            }),
            EntityRequest::Email(upsert) => EntityRecord::Email(match upsert {
                Upsert::Insert(r) => PatientEmail {
                    patient_email_id: fresh,
                    patient_id: r.patient_id,
                    email_address: r.email_address.clone(),
                },
                Upsert::Update(r) => PatientEmail {
                    patient_email_id: r.patient_email_id,
                    patient_id: 0,
                    email_address: r.email_address.clone(),
                },
            }),
            EntityRequest::Vital(r) => EntityRecord::Vital(PatientHealthVital {
                patient_health_vital_id: fresh,
                patient_id: r.patient_id,
                health_vital_type_code: r.health_vital_type_code.clone(),
                health_vital_value: r.health_vital_value.clone(),
            }),
        }
    }
}

#[async_trait]
impl PatientApi for FakeBackend {
    async fn search_patients(
        &self,
        criteria: &PatientSearchCriteria,
    ) -> BackendResult<Vec<PatientSearchResult>> {
        let mut state = self.state.lock().unwrap();
        state.searches.push(criteria.clone());
        if state.search_fails {
            return Err(BackendError::Transport {
                path: "/api/patients/search".into(),
                message: "connection refused".into(),
            });
        }
        Ok(state.search_results.clone())
    }

    async fn upsert(&self, request: &EntityRequest) -> BackendResult<EntityRecord> {
        self.state.lock().unwrap().requests.push(request.clone());

        let fails = self
            .fail_when
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|predicate| predicate(request));
        if fails {
            return Err(BackendError::UnexpectedStatus {
                path: request.kind().path().to_string(),
                expected: request.operation().expected_status(),
                actual: 500,
            });
        }

        Ok(self.echo(request))
    }

    async fn patient_profile(&self, patient_id: i64) -> BackendResult<PatientProfile> {
        Ok(self.seeded(patient_id, "/api/patients")?.profile)
    }

    async fn patient_identities(&self, patient_id: i64) -> BackendResult<Vec<PatientIdentity>> {
        Ok(self
            .seeded(patient_id, "/api/patients/identities/patient")?
            .identities)
    }

    async fn patient_addresses(&self, patient_id: i64) -> BackendResult<Vec<PatientAddress>> {
        Ok(self
            .seeded(patient_id, "/api/patients/addresses/patient")?
            .addresses)
    }

    async fn patient_phones(&self, patient_id: i64) -> BackendResult<Vec<PatientPhone>> {
        Ok(self.seeded(patient_id, "/api/patients/phones/patient")?.phones)
    }

    async fn patient_emails(&self, patient_id: i64) -> BackendResult<Vec<PatientEmail>> {
        Ok(self.seeded(patient_id, "/api/patients/emails/patient")?.emails)
    }
}

pub(crate) fn profile(patient_id: i64) -> PatientProfile {
    PatientProfile {
        patient_id,
        patient_code: format!("P{patient_id:06}"),
        firstname: "Asha".into(),
        middlename: None,
        lastname: "Rao".into(),
        gender_code: Some("F".into()),
        gender_name: "Female".into(),
        date_of_birth: "1990-04-12T00:00:00".into(),
    }
}

pub(crate) fn identity(patient_id: i64, id: i64) -> PatientIdentity {
    PatientIdentity {
        patient_identity_id: id,
        patient_id,
        identity_type_code: "PAN".into(),
        identity_type_name: Some("PAN card".into()),
        identity_number: format!("ABCDE{id:04}F"),
        issued_by: "Income Tax Department".into(),
        place_issued: "Pune".into(),
        expiry: None,
    }
}

pub(crate) fn address(patient_id: i64, id: i64) -> PatientAddress {
    PatientAddress {
        patient_address_id: id,
        patient_id,
        address_type_code: "HOME".into(),
        address_type_name: "Home".into(),
        address_line1: format!("{id} MG Road"),
        address_line2: None,
        address_line3: None,
        city: "Bengaluru".into(),
        pincode: "560001".into(),
        state_code: "KA".into(),
        state_name: "Karnataka".into(),
    }
}

pub(crate) fn phone(id: i64, type_code: &str, number: &str) -> PatientPhone {
    PatientPhone {
        patient_phone_id: id,
        patient_id: 7,
        phone_number: number.into(),
        phone_type_code: type_code.into(),
        phone_type_name: String::new(),
        listed_as: String::new(),
    }
}

pub(crate) fn email(patient_id: i64, id: i64) -> PatientEmail {
    PatientEmail {
        patient_email_id: id,
        patient_id,
        email_address: format!("asha{id}@example.com"),
    }
}

/// A patient whose profile is already saved under id 7.
pub(crate) fn saved_patient() -> crate::CurrentPatient {
    crate::CurrentPatient {
        profile: Some(profile(7)),
        ..Default::default()
    }
}

pub(crate) fn search_result(patient_id: i64) -> PatientSearchResult {
    PatientSearchResult {
        patient_id,
        patient_code: format!("P{patient_id:06}"),
        firstname: "Asha".into(),
        middlename: None,
        lastname: "Rao".into(),
        gender: "Female".into(),
        date_of_birth: "1990-04-12T00:00:00".into(),
        phone_number: "9876543210".into(),
        phone_numbers_string: "9876543210".into(),
        email_address: String::new(),
        email_addresses_string: String::new(),
        identity_number: String::new(),
        identity_numbers_string: String::new(),
    }
}

/// A desk whose notifications are collected for assertions.
pub(crate) fn desk() -> (crate::Desk, std::sync::Arc<crate::NotificationLog>) {
    let log = std::sync::Arc::new(crate::NotificationLog::new());
    (crate::Desk::new(log.clone()), log)
}
