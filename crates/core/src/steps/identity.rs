use super::{require_patient, save_entity, IntakeStep};
use crate::backend::PatientApi;
use crate::constants::MAX_TEXT_LEN;
use crate::desk::Desk;
use crate::models::{parse_backend_date, InsertIdentityRequest, UpdateIdentityRequest};
use crate::record::CurrentPatient;
use crate::upsert::{EntityRequest, Upsert};
use crate::validation::{is_alphanumeric, is_letters_and_spaces, required_text};
use crate::wizard::WizardStep;
use crate::ValidationErrors;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Step 2: one identity document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityForm {
    pub identity_type_code: String,
    pub identity_number: String,
    pub issued_by: String,
    pub place_issued: String,
    pub expiry: Option<NaiveDate>,
}

impl IdentityForm {
    pub fn from_patient(patient: &CurrentPatient) -> Self {
        match &patient.identity {
            Some(identity) => Self {
                identity_type_code: identity.identity_type_code.clone(),
                identity_number: identity.identity_number.clone(),
                issued_by: identity.issued_by.clone(),
                place_issued: identity.place_issued.clone(),
                expiry: identity.expiry.as_deref().and_then(parse_backend_date),
            },
            None => Self::default(),
        }
    }

    fn request(&self, patient_id: i64, existing_id: Option<i64>) -> EntityRequest {
        let identity_type_code = self.identity_type_code.trim().to_string();
        let identity_number = self.identity_number.trim().to_string();
        let issued_by = self.issued_by.trim().to_string();
        let place_issued = self.place_issued.trim().to_string();

        EntityRequest::Identity(Upsert::plan(
            existing_id,
            || InsertIdentityRequest {
                patient_id,
                identity_type_code: identity_type_code.clone(),
                identity_number: identity_number.clone(),
                issued_by: issued_by.clone(),
                place_issued: place_issued.clone(),
                expiry: self.expiry,
            },
            |patient_identity_id| UpdateIdentityRequest {
                patient_identity_id,
                identity_type_code: identity_type_code.clone(),
                identity_number: identity_number.clone(),
                issued_by: issued_by.clone(),
                place_issued: place_issued.clone(),
                expiry: self.expiry,
            },
        ))
    }
}

#[async_trait]
impl IntakeStep for IdentityForm {
    fn step(&self) -> WizardStep {
        WizardStep::Identity
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.identity_type_code.trim().is_empty() {
            errors.add("identityType", "Identity type is required");
        }
        if let Some(number) = required_text(
            &mut errors,
            "identityNumber",
            "Identity number",
            &self.identity_number,
            MAX_TEXT_LEN,
        ) {
            if !is_alphanumeric(&number) {
                errors.add(
                    "identityNumber",
                    "Identity number can contain letters and digits only",
                );
            }
        }
        if let Some(issued_by) =
            required_text(&mut errors, "issuedBy", "Issued by", &self.issued_by, MAX_TEXT_LEN)
        {
            if !is_letters_and_spaces(&issued_by) {
                errors.add("issuedBy", "Issued by can contain letters and spaces only");
            }
        }
        if let Some(place) = required_text(
            &mut errors,
            "placeIssued",
            "Place issued",
            &self.place_issued,
            MAX_TEXT_LEN,
        ) {
            if !is_letters_and_spaces(&place) {
                errors.add("placeIssued", "Place issued can contain letters and spaces only");
            }
        }

        errors.into_result()
    }

    async fn save(
        &self,
        api: &dyn PatientApi,
        patient: &mut CurrentPatient,
        desk: &Desk,
    ) -> bool {
        let Some(patient_id) = require_patient(patient, desk) else {
            return false;
        };
        let _busy = desk.begin_busy();
        let existing_id = patient.identity.as_ref().map(|i| i.patient_identity_id);
        let request = self.request(patient_id, existing_id);

        match save_entity(api, &request).await.and_then(|r| r.into_identity()) {
            Some(saved) => {
                desk.success(format!("Identity {}", request.operation().past_tense()));
                patient.set_identity(saved);
                true
            }
            None => {
                desk.error("Failed to save identity");
                false
            }
        }
    }
}
