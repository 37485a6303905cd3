use super::{save_entity, IntakeStep};
use crate::backend::PatientApi;
use crate::constants::MAX_TEXT_LEN;
use crate::desk::Desk;
use crate::models::{InsertProfileRequest, PatientProfile, UpdateProfileRequest};
use crate::record::CurrentPatient;
use crate::upsert::{EntityRequest, Upsert};
use crate::validation::{is_letters, optional_text, required_text};
use crate::wizard::WizardStep;
use crate::ValidationErrors;
use async_trait::async_trait;
use chrono::{Local, NaiveDate};

/// Step 1: name, gender and date of birth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub gender_code: String,
    pub date_of_birth: Option<NaiveDate>,
}

impl ProfileForm {
    pub fn from_patient(patient: &CurrentPatient) -> Self {
        match &patient.profile {
            Some(profile) => Self {
                first_name: profile.firstname.clone(),
                middle_name: profile.middlename.clone().unwrap_or_default(),
                last_name: profile.lastname.clone(),
                gender_code: profile.gender_code.clone().unwrap_or_default(),
                date_of_birth: profile.birth_date(),
            },
            None => Self::default(),
        }
    }

    /// Validates against `today` so a birth date in the future is rejected.
    pub fn validate_on(&self, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(first) =
            required_text(&mut errors, "firstName", "First name", &self.first_name, MAX_TEXT_LEN)
        {
            if !is_letters(&first) {
                errors.add("firstName", "First name can contain letters only");
            }
        }
        if let Some(middle) = optional_text(&self.middle_name) {
            if middle.len() > MAX_TEXT_LEN {
                errors.add(
                    "middleName",
                    format!("Middle name cannot be longer than {MAX_TEXT_LEN} characters"),
                );
            } else if !is_letters(&middle) {
                errors.add("middleName", "Middle name can contain letters only");
            }
        }
        if let Some(last) =
            required_text(&mut errors, "lastName", "Last name", &self.last_name, MAX_TEXT_LEN)
        {
            if !is_letters(&last) {
                errors.add("lastName", "Last name can contain letters only");
            }
        }
        if self.gender_code.trim().is_empty() {
            errors.add("gender", "Gender is required");
        }
        match self.date_of_birth {
            None => errors.add("dateOfBirth", "Date of birth is required"),
            Some(dob) if dob > today => {
                errors.add("dateOfBirth", "Date of birth cannot be in the future")
            }
            Some(_) => {}
        }

        errors.into_result()
    }

    fn request(&self, patient: &CurrentPatient) -> EntityRequest {
        let firstname = self.first_name.trim().to_string();
        let middlename = self.middle_name.trim().to_string();
        let lastname = self.last_name.trim().to_string();
        let gender_code = self.gender_code.trim().to_string();

        EntityRequest::Profile(Upsert::plan(
            patient.patient_id(),
            || InsertProfileRequest {
                firstname: firstname.clone(),
                middlename: middlename.clone(),
                lastname: lastname.clone(),
                gender_code: gender_code.clone(),
                date_of_birth: self.date_of_birth,
                force_create: false,
            },
            |patient_id| UpdateProfileRequest {
                patient_id,
                firstname: firstname.clone(),
                middlename: middlename.clone(),
                lastname: lastname.clone(),
                gender_code: gender_code.clone(),
                date_of_birth: self.date_of_birth,
            },
        ))
    }

    /// Fills blanks in the stored record from the submitted form.
    fn merge_into(&self, mut saved: PatientProfile) -> PatientProfile {
        if saved.firstname.trim().is_empty() {
            saved.firstname = self.first_name.trim().to_string();
        }
        if saved.lastname.trim().is_empty() {
            saved.lastname = self.last_name.trim().to_string();
        }
        if saved.middlename.is_none() {
            saved.middlename = optional_text(&self.middle_name);
        }
        if saved.gender_code.as_deref().map_or(true, |g| g.trim().is_empty()) {
            saved.gender_code = optional_text(&self.gender_code);
        }
        if saved.date_of_birth.trim().is_empty() {
            if let Some(dob) = self.date_of_birth {
                saved.date_of_birth = dob.to_string();
            }
        }
        saved
    }
}

#[async_trait]
impl IntakeStep for ProfileForm {
    fn step(&self) -> WizardStep {
        WizardStep::Profile
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        self.validate_on(Local::now().date_naive())
    }

    async fn save(
        &self,
        api: &dyn PatientApi,
        patient: &mut CurrentPatient,
        desk: &Desk,
    ) -> bool {
        let _busy = desk.begin_busy();
        let request = self.request(patient);

        match save_entity(api, &request).await.and_then(|r| r.into_profile()) {
            Some(saved) => {
                let saved = self.merge_into(saved);
                desk.success(format!(
                    "Patient profile {}",
                    request.operation().past_tense()
                ));
                patient.set_profile(saved);
                true
            }
            None => {
                desk.error("Failed to save patient profile");
                false
            }
        }
    }
}
