use super::{require_patient, save_entity, IntakeStep};
use crate::backend::PatientApi;
use crate::constants::{MAX_PHONE_LEN, PHONE_TYPE_HOME, PHONE_TYPE_MOBILE, PHONE_TYPE_OTHER};
use crate::desk::Desk;
use crate::models::{InsertEmailRequest, InsertPhoneRequest, UpdateEmailRequest, UpdatePhoneRequest};
use crate::record::CurrentPatient;
use crate::upsert::{EntityRecord, EntityRequest, Upsert};
use crate::validation::{is_digits, is_email, optional_text};
use crate::wizard::WizardStep;
use crate::ValidationErrors;
use async_trait::async_trait;

/// Step 4: mobile, home and other phone numbers plus an email address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub mobile_phone: String,
    pub home_phone: String,
    pub other_phone: String,
    pub email_address: String,
}

enum SubSave {
    Skipped,
    Saved(EntityRecord),
    Failed,
}

impl ContactForm {
    pub fn from_patient(patient: &CurrentPatient) -> Self {
        let number = |phone: Option<&crate::models::PatientPhone>| {
            phone.map(|p| p.phone_number.clone()).unwrap_or_default()
        };
        Self {
            mobile_phone: number(patient.mobile_phone()),
            home_phone: number(patient.home_phone()),
            other_phone: number(patient.other_phone()),
            email_address: patient
                .email
                .as_ref()
                .map(|e| e.email_address.clone())
                .unwrap_or_default(),
        }
    }

    fn phone_request(
        patient: &CurrentPatient,
        patient_id: i64,
        value: &str,
        type_code: &str,
        listed_as: &str,
    ) -> Option<EntityRequest> {
        let phone_number = optional_text(value)?;
        let existing_id = patient
            .phone_of_type(type_code)
            .map(|phone| phone.patient_phone_id);

        Some(EntityRequest::Phone(Upsert::plan(
            existing_id,
            || InsertPhoneRequest {
                patient_id,
                phone_number: phone_number.clone(),
                phone_type_code: type_code.to_string(),
                listed_as: listed_as.to_string(),
            },
            |patient_phone_id| UpdatePhoneRequest {
                patient_phone_id,
                phone_number: phone_number.clone(),
                phone_type_code: type_code.to_string(),
                listed_as: listed_as.to_string(),
            },
        )))
    }

    fn email_request(&self, patient: &CurrentPatient, patient_id: i64) -> Option<EntityRequest> {
        let email_address = optional_text(&self.email_address)?;
        let existing_id = patient.email.as_ref().map(|e| e.patient_email_id);

        Some(EntityRequest::Email(Upsert::plan(
            existing_id,
            || InsertEmailRequest {
                patient_id,
                email_address: email_address.clone(),
            },
            |patient_email_id| UpdateEmailRequest {
                patient_email_id,
                email_address: email_address.clone(),
            },
        )))
    }

    fn validate_optional_phone(
        errors: &mut ValidationErrors,
        field: &'static str,
        label: &str,
        value: &str,
    ) {
        let Some(number) = optional_text(value) else {
            return;
        };
        if !is_digits(&number) {
            errors.add(field, format!("{label} can contain digits only"));
        } else if number.len() > MAX_PHONE_LEN {
            errors.add(
                field,
                format!("{label} cannot be longer than {MAX_PHONE_LEN} digits"),
            );
        }
    }
}

async fn sub_save(api: &dyn PatientApi, request: Option<&EntityRequest>) -> SubSave {
    match request {
        None => SubSave::Skipped,
        Some(request) => match save_entity(api, request).await {
            Some(record) => SubSave::Saved(record),
            None => SubSave::Failed,
        },
    }
}

#[async_trait]
impl IntakeStep for ContactForm {
    fn step(&self) -> WizardStep {
        WizardStep::Contact
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        match optional_text(&self.mobile_phone) {
            None => errors.add("mobilePhone", "Mobile phone is required"),
            Some(mobile) if mobile.len() != 10 || !is_digits(&mobile) => {
                errors.add("mobilePhone", "Mobile phone must be 10 digits")
            }
            Some(_) => {}
        }
        Self::validate_optional_phone(&mut errors, "homePhone", "Home phone", &self.home_phone);
        Self::validate_optional_phone(&mut errors, "otherPhone", "Other phone", &self.other_phone);
        if let Some(email) = optional_text(&self.email_address) {
            if !is_email(&email) {
                errors.add("emailAddress", "Enter a valid email address");
            }
        }

        errors.into_result()
    }

    /// Saves the three phones and the email concurrently.
    ///
    /// Blank values are skipped and count as saved. Every record that was stored is kept in
    /// `patient` even when another sub-save failed; the step then reports failure.
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

        let mobile =
            Self::phone_request(patient, patient_id, &self.mobile_phone, PHONE_TYPE_MOBILE, "Mobile");
        let home = Self::phone_request(patient, patient_id, &self.home_phone, PHONE_TYPE_HOME, "Home");
        let other =
            Self::phone_request(patient, patient_id, &self.other_phone, PHONE_TYPE_OTHER, "Other");
        let email = self.email_request(patient, patient_id);

        let outcomes = futures::join!(
            sub_save(api, mobile.as_ref()),
            sub_save(api, home.as_ref()),
            sub_save(api, other.as_ref()),
            sub_save(api, email.as_ref()),
        );

        let mut failed = 0;
        for outcome in [outcomes.0, outcomes.1, outcomes.2, outcomes.3] {
            match outcome {
                SubSave::Skipped => {}
                SubSave::Saved(EntityRecord::Phone(phone)) => patient.set_phone(phone),
                SubSave::Saved(EntityRecord::Email(email)) => patient.set_email(email),
                SubSave::Saved(_) => {}
                SubSave::Failed => failed += 1,
            }
        }

        if failed == 0 {
            desk.success("Contact details saved");
            true
        } else {
            tracing::warn!("{failed} of the contact details failed to save");
            desk.error("Failed to save contact details");
            false
        }
    }
}
