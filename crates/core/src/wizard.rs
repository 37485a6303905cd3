//! # Intake wizard
//!
//! A linear five-step flow: Profile, Identity, Address, Contact, HealthVitals.
//!
//! ## Transitions
//!
//! - **Next** is only taken after the active step's save resolves to success. From the last
//!   step it completes the wizard instead of entering a sixth step. A failed save leaves the
//!   wizard where it was, and the user may retry as often as they like.
//! - **Back** needs no save. From the first step it abandons the wizard.
//!
//! There are no jumps, and nothing about the wizard outlives it. Once completed or abandoned
//! the wizard stays in that state and every further call reports it again.
//!
//! Whether a step inserts or updates is the step's own decision; see [`crate::upsert`].

use crate::backend::PatientApi;
use crate::desk::Desk;
use crate::record::CurrentPatient;
use crate::steps::IntakeStep;
use crate::ValidationErrors;
use std::future::Future;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WizardStep {
    Profile,
    Identity,
    Address,
    Contact,
    HealthVitals,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::Profile,
        WizardStep::Identity,
        WizardStep::Address,
        WizardStep::Contact,
        WizardStep::HealthVitals,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The following step, or `None` from the last one.
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// The preceding step, or `None` from the first one.
    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Profile => "Patient profile",
            WizardStep::Identity => "Identity",
            WizardStep::Address => "Address",
            WizardStep::Contact => "Contact details",
            WizardStep::HealthVitals => "Health vitals",
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// What a Next or Back call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Entered this step.
    Moved(WizardStep),
    /// Stayed on this step because its save failed.
    Stayed(WizardStep),
    /// Left past the last step; the caller navigates away.
    Completed,
    /// Left before the first step; the caller navigates away.
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WizardState {
    Active(WizardStep),
    Completed,
    Abandoned,
}

#[derive(Debug, Clone)]
pub struct IntakeWizard {
    id: Uuid,
    state: WizardState,
}

impl Default for IntakeWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl IntakeWizard {
    /// Starts on the Profile step.
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        tracing::debug!("intake wizard {id} started");
        Self {
            id,
            state: WizardState::Active(WizardStep::Profile),
        }
    }

    /// Identifier used to correlate log lines of one wizard run.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The active step, or `None` once the wizard has been left.
    pub fn current(&self) -> Option<WizardStep> {
        match self.state {
            WizardState::Active(step) => Some(step),
            WizardState::Completed | WizardState::Abandoned => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.current().is_none()
    }

    fn exit(&self) -> Option<Navigation> {
        match self.state {
            WizardState::Active(_) => None,
            WizardState::Completed => Some(Navigation::Completed),
            WizardState::Abandoned => Some(Navigation::Abandoned),
        }
    }

    /// Applies the outcome of the active step's save.
    pub fn record_save(&mut self, saved: bool) -> Navigation {
        let step = match self.state {
            WizardState::Active(step) => step,
            WizardState::Completed => return Navigation::Completed,
            WizardState::Abandoned => return Navigation::Abandoned,
        };

        if !saved {
            tracing::info!("wizard {}: {step} not saved, staying", self.id);
            return Navigation::Stayed(step);
        }

        match step.next() {
            Some(next) => {
                tracing::info!("wizard {}: {step} saved, moving to {next}", self.id);
                self.state = WizardState::Active(next);
                Navigation::Moved(next)
            }
            None => {
                tracing::info!("wizard {}: completed", self.id);
                self.state = WizardState::Completed;
                Navigation::Completed
            }
        }
    }

    /// Awaits the active step's save and moves on only if it succeeded.
    ///
    /// The save future is not polled once the wizard has been left.
    pub async fn next<F>(&mut self, save: F) -> Navigation
    where
        F: Future<Output = bool>,
    {
        if let Some(exit) = self.exit() {
            return exit;
        }
        let saved = save.await;
        self.record_save(saved)
    }

    /// Moves to the previous step without saving.
    pub fn back(&mut self) -> Navigation {
        let step = match self.state {
            WizardState::Active(step) => step,
            WizardState::Completed => return Navigation::Completed,
            WizardState::Abandoned => return Navigation::Abandoned,
        };

        match step.previous() {
            Some(previous) => {
                tracing::info!("wizard {}: back to {previous}", self.id);
                self.state = WizardState::Active(previous);
                Navigation::Moved(previous)
            }
            None => {
                tracing::info!("wizard {}: abandoned", self.id);
                self.state = WizardState::Abandoned;
                Navigation::Abandoned
            }
        }
    }

    /// Validates and saves `form`, then advances on success.
    ///
    /// # Errors
    ///
    /// Returns the field errors when the form is invalid; nothing is saved and the wizard
    /// stays on the step.
    pub async fn submit(
        &mut self,
        form: &dyn IntakeStep,
        api: &dyn PatientApi,
        patient: &mut CurrentPatient,
        desk: &Desk,
    ) -> Result<Navigation, ValidationErrors> {
        let step = match self.state {
            WizardState::Active(step) => step,
            WizardState::Completed => return Ok(Navigation::Completed),
            WizardState::Abandoned => return Ok(Navigation::Abandoned),
        };

        if form.step() != step {
            tracing::warn!(
                "wizard {}: {} form submitted while on {step}",
                self.id,
                form.step()
            );
            return Ok(Navigation::Stayed(step));
        }

        form.validate()?;
        Ok(self.next(form.save(api, patient, desk)).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::{ContactForm, IdentityForm, ProfileForm};
    use crate::testing::{self, FakeBackend};
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn wizard_at(step: WizardStep) -> IntakeWizard {
        let mut wizard = IntakeWizard::new();
        for _ in 0..step.index() {
            wizard.record_save(true);
        }
        assert_eq!(wizard.current(), Some(step));
        wizard
    }

    #[test]
    fn step_order_is_fixed() {
        assert_eq!(WizardStep::Profile.next(), Some(WizardStep::Identity));
        assert_eq!(WizardStep::HealthVitals.next(), None);
        assert_eq!(WizardStep::Profile.previous(), None);
        assert_eq!(WizardStep::from_index(3), Some(WizardStep::Contact));
        assert_eq!(WizardStep::from_index(5), None);
    }

    #[test]
    fn back_from_first_step_abandons() {
        let mut wizard = IntakeWizard::new();
        assert_eq!(wizard.current(), Some(WizardStep::Profile));
        assert_eq!(wizard.back(), Navigation::Abandoned);
        assert!(wizard.is_finished());
    }

    #[tokio::test]
    async fn next_from_last_step_completes() {
        let mut wizard = wizard_at(WizardStep::HealthVitals);
        assert_eq!(wizard.next(async { true }).await, Navigation::Completed);
        assert_eq!(wizard.current(), None);
    }

    #[tokio::test]
    async fn failed_saves_never_advance() {
        let mut wizard = wizard_at(WizardStep::Address);
        for _ in 0..5 {
            assert_eq!(
                wizard.next(async { false }).await,
                Navigation::Stayed(WizardStep::Address)
            );
        }
        assert_eq!(
            wizard.next(async { true }).await,
            Navigation::Moved(WizardStep::Contact)
        );
    }

    #[test]
    fn back_moves_without_saving() {
        let mut wizard = wizard_at(WizardStep::Contact);
        assert_eq!(wizard.back(), Navigation::Moved(WizardStep::Address));
        assert_eq!(wizard.current(), Some(WizardStep::Address));
    }

    #[tokio::test]
    async fn finished_wizard_is_terminal() {
        let mut wizard = IntakeWizard::new();
        wizard.back();

        let polled = AtomicBool::new(false);
        let navigation = wizard
            .next(async {
                polled.store(true, Ordering::SeqCst);
                true
            })
            .await;

        assert_eq!(navigation, Navigation::Abandoned);
        assert!(!polled.load(Ordering::SeqCst));
        assert_eq!(wizard.back(), Navigation::Abandoned);
        assert_eq!(wizard.record_save(true), Navigation::Abandoned);
    }

    #[tokio::test]
    async fn submit_validates_before_saving() {
        let backend = FakeBackend::new();
        let (desk, _log) = testing::desk();
        let mut patient = CurrentPatient::default();
        let mut wizard = IntakeWizard::new();

        let errors = wizard
            .submit(&ProfileForm::default(), &backend, &mut patient, &desk)
            .await
            .expect_err("blank profile is invalid");

        assert!(errors.get("firstName").is_some());
        assert!(backend.requests().is_empty());
        assert_eq!(wizard.current(), Some(WizardStep::Profile));
    }

    #[tokio::test]
    async fn submit_advances_after_successful_save() {
        let backend = FakeBackend::new();
        let (desk, _log) = testing::desk();
        let mut patient = CurrentPatient::default();
        let mut wizard = IntakeWizard::new();
        let form = ProfileForm {
            first_name: "Asha".into(),
            last_name: "Rao".into(),
            gender_code: "F".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 12),
            ..ProfileForm::default()
        };

        let navigation = wizard
            .submit(&form, &backend, &mut patient, &desk)
            .await
            .expect("valid form");

        assert_eq!(navigation, Navigation::Moved(WizardStep::Identity));
        assert!(patient.patient_id().is_some());
    }

    #[tokio::test]
    async fn submit_stays_when_contact_save_partially_fails() {
        let backend = FakeBackend::new();
        backend.fail_when(|request| request.kind() == crate::upsert::EntityKind::Email);
        let (desk, _log) = testing::desk();
        let mut patient = testing::saved_patient();
        let mut wizard = wizard_at(WizardStep::Contact);
        let form = ContactForm {
            mobile_phone: "9876543210".into(),
            home_phone: "0801234567".into(),
            other_phone: "0207654321".into(),
            email_address: "asha@example.com".into(),
        };

        let navigation = wizard
            .submit(&form, &backend, &mut patient, &desk)
            .await
            .expect("valid form");

        assert_eq!(navigation, Navigation::Stayed(WizardStep::Contact));
        assert_eq!(patient.phones.len(), 3);

        backend.succeed_always();
        let navigation = wizard
            .submit(&form, &backend, &mut patient, &desk)
            .await
            .expect("valid form");
        assert_eq!(navigation, Navigation::Moved(WizardStep::HealthVitals));
    }

    #[tokio::test]
    async fn form_for_another_step_is_ignored() {
        let backend = FakeBackend::new();
        let (desk, _log) = testing::desk();
        let mut patient = testing::saved_patient();
        let mut wizard = IntakeWizard::new();

        let navigation = wizard
            .submit(&IdentityForm::default(), &backend, &mut patient, &desk)
            .await
            .expect("no validation for mismatched step");

        assert_eq!(navigation, Navigation::Stayed(WizardStep::Profile));
        assert!(backend.requests().is_empty());
    }
}
