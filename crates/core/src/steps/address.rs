use super::{require_patient, save_entity, IntakeStep};
use crate::backend::PatientApi;
use crate::constants::{MAX_PINCODE_LEN, MAX_TEXT_LEN};
use crate::desk::Desk;
use crate::master::state_name;
use crate::models::{InsertAddressRequest, UpdateAddressRequest};
use crate::record::CurrentPatient;
use crate::upsert::{EntityRequest, Upsert};
use crate::validation::{optional_text, required_text};
use crate::wizard::WizardStep;
use crate::ValidationErrors;
use async_trait::async_trait;

/// Step 3: postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressForm {
    pub address_type_code: String,
    pub address_line1: String,
    pub address_line2: String,
    pub address_line3: String,
    pub city: String,
    pub pincode: String,
    pub state_code: String,
}

impl AddressForm {
    pub fn from_patient(patient: &CurrentPatient) -> Self {
        match &patient.address {
            Some(address) => Self {
                address_type_code: address.address_type_code.clone(),
                address_line1: address.address_line1.clone(),
                address_line2: address.address_line2.clone().unwrap_or_default(),
                address_line3: address.address_line3.clone().unwrap_or_default(),
                city: address.city.clone(),
                pincode: address.pincode.clone(),
                state_code: address.state_code.clone(),
            },
            None => Self::default(),
        }
    }

    fn request(&self, patient_id: i64, existing_id: Option<i64>) -> EntityRequest {
        let address_type_code = self.address_type_code.trim().to_string();
        let address_line1 = self.address_line1.trim().to_string();
        let address_line2 = optional_text(&self.address_line2);
        let address_line3 = optional_text(&self.address_line3);
        let city = self.city.trim().to_string();
        let pincode = self.pincode.trim().to_string();
        let state_code = self.state_code.trim().to_string();

        EntityRequest::Address(Upsert::plan(
            existing_id,
            || InsertAddressRequest {
                patient_id,
                address_type_code: address_type_code.clone(),
                address_line1: address_line1.clone(),
                address_line2: address_line2.clone(),
                address_line3: address_line3.clone(),
                city: city.clone(),
                pincode: pincode.clone(),
                state_code: state_code.clone(),
            },
            |patient_address_id| UpdateAddressRequest {
                patient_address_id,
                address_type_code: address_type_code.clone(),
                address_line1: address_line1.clone(),
                address_line2: address_line2.clone(),
                address_line3: address_line3.clone(),
                city: city.clone(),
                pincode: pincode.clone(),
                state_code: state_code.clone(),
            },
        ))
    }
}

#[async_trait]
impl IntakeStep for AddressForm {
    fn step(&self) -> WizardStep {
        WizardStep::Address
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.address_type_code.trim().is_empty() {
            errors.add("addressType", "Address type is required");
        }
        required_text(
            &mut errors,
            "addressLine1",
            "Address line 1",
            &self.address_line1,
            MAX_TEXT_LEN,
        );
        for (field, label, value) in [
            ("addressLine2", "Address line 2", &self.address_line2),
            ("addressLine3", "Address line 3", &self.address_line3),
        ] {
            if value.trim().len() > MAX_TEXT_LEN {
                errors.add(
                    field,
                    format!("{label} cannot be longer than {MAX_TEXT_LEN} characters"),
                );
            }
        }
        required_text(&mut errors, "city", "City", &self.city, MAX_TEXT_LEN);
        required_text(&mut errors, "pincode", "Pincode", &self.pincode, MAX_PINCODE_LEN);

        let state_code = self.state_code.trim();
        if state_code.is_empty() {
            errors.add("state", "State is required");
        } else if state_name(state_code).is_none() {
            errors.add("state", "Select a valid state");
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
        let existing_id = patient.address.as_ref().map(|a| a.patient_address_id);
        let request = self.request(patient_id, existing_id);

        match save_entity(api, &request).await.and_then(|r| r.into_address()) {
            Some(saved) => {
                desk.success(format!("Address {}", request.operation().past_tense()));
                patient.set_address(saved);
                true
            }
            None => {
                desk.error("Failed to save address");
                false
            }
        }
    }
}
