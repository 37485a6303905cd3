//! Patient search session and selection.

use crate::backend::PatientApi;
use crate::constants::SEARCH_PAGE_SIZE;
use crate::criteria::{AdvancedSearchForm, PatientSearchCriteria};
use crate::desk::Desk;
use crate::models::PatientSearchResult;
use crate::record::{load_patient, CurrentPatient};
use crate::search::classify;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// No criterion had a value, so nothing was sent.
    Skipped,
    NoResults,
    Found(Vec<PatientSearchResult>),
    /// The search request failed; the user has been notified.
    Failed,
}

/// Sends `criteria` to the backend.
///
/// An empty result raises a "No results found" warning and a failed request an error
/// notification.
pub async fn run_search(
    api: &dyn PatientApi,
    desk: &Desk,
    criteria: &PatientSearchCriteria,
) -> SearchOutcome {
    if !criteria.has_any_value() {
        tracing::debug!("search skipped: no criteria");
        return SearchOutcome::Skipped;
    }

    let _busy = desk.begin_busy();
    match api.search_patients(criteria).await {
        Ok(results) if results.is_empty() => {
            desk.warning("No results found");
            SearchOutcome::NoResults
        }
        Ok(results) => {
            tracing::info!("search found {} patients", results.len());
            SearchOutcome::Found(results)
        }
        Err(err) => {
            tracing::error!("patient search failed: {err}");
            desk.error("Patient search failed");
            SearchOutcome::Failed
        }
    }
}

/// Basic search: classifies `query` and searches by the resulting keywords.
pub async fn search_by_text(api: &dyn PatientApi, desk: &Desk, query: &str) -> SearchOutcome {
    let criteria = PatientSearchCriteria::from_keywords(&classify(query));
    run_search(api, desk, &criteria).await
}

/// Advanced search from the separate form fields.
pub async fn search_by_form(
    api: &dyn PatientApi,
    desk: &Desk,
    form: &AdvancedSearchForm,
) -> SearchOutcome {
    run_search(api, desk, &form.to_criteria()).await
}

/// The 1-based `page` of `items`, [`SEARCH_PAGE_SIZE`] per page. Page 0 is read as page 1.
pub fn paginate<T>(items: &[T], page: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(SEARCH_PAGE_SIZE);
    if start >= items.len() {
        return &[];
    }
    let end = (start + SEARCH_PAGE_SIZE).min(items.len());
    &items[start..end]
}

pub fn page_count(total: usize) -> usize {
    total.div_ceil(SEARCH_PAGE_SIZE)
}

/// Loads the selected search result into a fresh current patient.
///
/// On failure the user is notified and `None` is returned.
pub async fn select_patient(
    api: &dyn PatientApi,
    desk: &Desk,
    result: &PatientSearchResult,
) -> Option<CurrentPatient> {
    let _busy = desk.begin_busy();
    match load_patient(api, result.patient_id).await {
        Ok(patient) => Some(patient),
        Err(err) => {
            tracing::error!("failed to load patient {}: {err}", result.patient_id);
            desk.error("Failed to load patient details");
            None
        }
    }
}
