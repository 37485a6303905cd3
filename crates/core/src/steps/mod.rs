//! The five intake steps.
//!
//! Each step owns its form values, prefilled from the [`CurrentPatient`], validates them
//! field by field, and saves them through the [`PatientApi`]. Saving never returns an error
//! to the wizard: failures are logged and notified, and the step reports a plain `bool`.

mod address;
mod contact;
mod identity;
mod profile;
mod vitals;

pub use address::AddressForm;
pub use contact::ContactForm;
pub use identity::IdentityForm;
pub use profile::ProfileForm;
pub use vitals::{age_description, VitalEntry, VitalsForm};

use crate::backend::PatientApi;
use crate::desk::Desk;
use crate::record::CurrentPatient;
use crate::upsert::{EntityRecord, EntityRequest};
use crate::wizard::WizardStep;
use crate::ValidationErrors;
use async_trait::async_trait;

/// Save collaborator behind one wizard step.
#[async_trait]
pub trait IntakeStep: Send + Sync {
    fn step(&self) -> WizardStep;

    fn validate(&self) -> Result<(), ValidationErrors>;

    /// Saves the form and mirrors the stored records into `patient`.
    ///
    /// # Returns
    ///
    /// `true` when every record the step sends was stored.
    async fn save(&self, api: &dyn PatientApi, patient: &mut CurrentPatient, desk: &Desk)
        -> bool;
}

/// Sends one upsert, logging the outcome.
pub(crate) async fn save_entity(
    api: &dyn PatientApi,
    request: &EntityRequest,
) -> Option<EntityRecord> {
    let kind = request.kind();
    let operation = request.operation();
    match api.upsert(request).await {
        Ok(record) if record.kind() == kind => {
            tracing::info!("{} {}", kind.label(), operation.past_tense());
            Some(record)
        }
        Ok(record) => {
            tracing::error!(
                "{} save answered with a {} record",
                kind.label(),
                record.kind().label()
            );
            None
        }
        Err(err) => {
            tracing::error!("failed to save {}: {err}", kind.label());
            None
        }
    }
}

/// The saved patient id, or an error banner when the profile has not been saved yet.
pub(crate) fn require_patient(patient: &CurrentPatient, desk: &Desk) -> Option<i64> {
    let patient_id = patient.patient_id();
    if patient_id.is_none() {
        tracing::warn!("step saved before the patient profile");
        desk.error("Save the patient profile first");
    }
    patient_id
}
