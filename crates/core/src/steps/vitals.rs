use super::{require_patient, save_entity, IntakeStep};
use crate::backend::PatientApi;
use crate::constants::MAX_TEXT_LEN;
use crate::desk::Desk;
use crate::models::InsertVitalRequest;
use crate::record::CurrentPatient;
use crate::upsert::EntityRequest;
use crate::wizard::WizardStep;
use crate::ValidationErrors;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};

/// One health-vital reading, e.g. `("BP", "120/80")`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VitalEntry {
    pub type_code: String,
    pub value: String,
}

impl VitalEntry {
    pub fn new(type_code: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            type_code: type_code.into(),
            value: value.into(),
        }
    }

    fn is_complete(&self) -> bool {
        !self.type_code.trim().is_empty() && !self.value.trim().is_empty()
    }

    fn is_recorded(&self, patient: &CurrentPatient) -> bool {
        let (code, value) = (self.type_code.trim(), self.value.trim());
        patient
            .vitals
            .iter()
            .any(|vital| vital.health_vital_type_code == code && vital.health_vital_value == value)
    }
}

/// Step 5: health vitals. Readings are only ever added, never updated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VitalsForm {
    pub entries: Vec<VitalEntry>,
}

impl VitalsForm {
    /// Readings not yet stored for `patient`. A retry after a partial failure only sends
    /// the ones that failed.
    fn requests(&self, patient: &CurrentPatient, patient_id: i64) -> Vec<EntityRequest> {
        self.entries
            .iter()
            .filter(|entry| entry.is_complete() && !entry.is_recorded(patient))
            .map(|entry| {
                EntityRequest::Vital(InsertVitalRequest {
                    patient_id,
                    health_vital_type_code: entry.type_code.trim().to_string(),
                    health_vital_value: entry.value.trim().to_string(),
                })
            })
            .collect()
    }
}

#[async_trait]
impl IntakeStep for VitalsForm {
    fn step(&self) -> WizardStep {
        WizardStep::HealthVitals
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self
            .entries
            .iter()
            .any(|entry| entry.value.trim().len() > MAX_TEXT_LEN)
        {
            errors.add(
                "healthVitalValue",
                format!("Health vital value cannot be longer than {MAX_TEXT_LEN} characters"),
            );
        }
        errors.into_result()
    }

    /// Inserts every complete reading concurrently. Incomplete rows are ignored.
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
        let requests = self.requests(patient, patient_id);

        let saved = futures::future::join_all(
            requests.iter().map(|request| save_entity(api, request)),
        )
        .await;

        let mut all_saved = true;
        for record in saved {
            match record.and_then(|r| r.into_vital()) {
                Some(vital) => patient.add_vital(vital),
                None => all_saved = false,
            }
        }

        if all_saved {
            desk.success("Health vitals saved");
        } else {
            desk.error("Failed to save health vitals");
        }
        all_saved
    }
}

/// Calendar age such as `"34 years, 1 month, 20 days"`. Zero parts are left out.
///
/// Returns an empty string when `dob` is after `today`.
pub fn age_description(dob: NaiveDate, today: NaiveDate) -> String {
    if dob > today {
        return String::new();
    }

    let mut years = today.year() - dob.year();
    let mut months = today.month() as i32 - dob.month() as i32;
    let mut days = today.day() as i32 - dob.day() as i32;

    if days < 0 {
        months -= 1;
        days += days_in_previous_month(today) as i32;
    }
    if months < 0 {
        years -= 1;
        months += 12;
    }

    let parts: Vec<String> = [(years, "year"), (months, "month"), (days, "day")]
        .into_iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, unit)| {
            if count == 1 {
                format!("{count} {unit}")
            } else {
                format!("{count} {unit}s")
            }
        })
        .collect();
    parts.join(", ")
}

fn days_in_previous_month(date: NaiveDate) -> u32 {
    date.with_day(1)
        .and_then(|first| first.pred_opt())
        .map_or(30, |last| last.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Severity;
    use crate::testing::{self, FakeBackend};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn age_borrows_days_and_months() {
        assert_eq!(
            age_description(date(1990, 4, 12), date(2024, 6, 1)),
            "34 years, 1 month, 20 days"
        );
        assert_eq!(age_description(date(2000, 3, 1), date(2024, 3, 1)), "24 years");
        assert_eq!(age_description(date(2024, 5, 31), date(2024, 6, 1)), "1 day");
        assert_eq!(age_description(date(2024, 6, 1), date(2024, 6, 1)), "");
        assert_eq!(age_description(date(2025, 1, 1), date(2024, 6, 1)), "");
    }

    #[tokio::test]
    async fn inserts_only_complete_readings() {
        let backend = FakeBackend::new();
        let (desk, log) = testing::desk();
        let mut patient = testing::saved_patient();
        let form = VitalsForm {
            entries: vec![
                VitalEntry::new("BP", "120/80"),
                VitalEntry::new("PULSE", " "),
                VitalEntry::new("TEMP", "98.6"),
            ],
        };

        assert!(form.save(&backend, &mut patient, &desk).await);
        assert_eq!(backend.requests().len(), 2);
        assert_eq!(patient.vitals.len(), 2);
        assert_eq!(log.last().map(|n| n.severity), Some(Severity::Success));
    }

    #[tokio::test]
    async fn any_failed_reading_fails_the_step() {
        let backend = FakeBackend::new();
        backend.fail_when(|request| {
            request
                .body()
                .map(|body| body["healthVitalTypeCode"] == "TEMP")
                .unwrap_or(false)
        });
        let (desk, _log) = testing::desk();
        let mut patient = testing::saved_patient();
        let form = VitalsForm {
            entries: vec![VitalEntry::new("BP", "120/80"), VitalEntry::new("TEMP", "98.6")],
        };

        assert!(!form.save(&backend, &mut patient, &desk).await);
        assert_eq!(patient.vitals.len(), 1);
    }

    #[tokio::test]
    async fn retry_sends_only_the_failed_reading() {
        let backend = FakeBackend::new();
        backend.fail_when(|request| {
            request
                .body()
                .map(|body| body["healthVitalTypeCode"] == "TEMP")
                .unwrap_or(false)
        });
        let (desk, _log) = testing::desk();
        let mut patient = testing::saved_patient();
        let form = VitalsForm {
            entries: vec![VitalEntry::new("BP", "120/80"), VitalEntry::new("TEMP", "98.6")],
        };

        assert!(!form.save(&backend, &mut patient, &desk).await);
        backend.succeed_always();
        assert!(form.save(&backend, &mut patient, &desk).await);

        let posts_for = |code: &str| {
            backend
                .requests()
                .iter()
                .filter(|r| r.body().map(|b| b["healthVitalTypeCode"] == code).unwrap_or(false))
                .count()
        };
        assert_eq!(posts_for("BP"), 1);
        assert_eq!(posts_for("TEMP"), 2);
        assert_eq!(patient.vitals.len(), 2);
    }

    #[tokio::test]
    async fn empty_form_saves_nothing() {
        let backend = FakeBackend::new();
        let (desk, _log) = testing::desk();
        let mut patient = testing::saved_patient();

        assert!(VitalsForm::default().save(&backend, &mut patient, &desk).await);
        assert!(backend.requests().is_empty());
    }
}
