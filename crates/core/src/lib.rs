//! # Front Desk Core
//!
//! Core logic of the hospital front-desk client.
//!
//! This crate contains:
//! - Free-text search keyword classification and search criteria
//! - The five-step patient intake wizard and its save steps
//! - Insert-or-update requests for every patient entity
//! - The current patient record, search session and patient selection
//! - Master data, notifications and the busy indicator
//!
//! **No HTTP concerns**: the backend is reached through the traits in [`backend`];
//! `frontdesk-client` implements them over REST.

pub mod auth;
pub mod backend;
pub mod busy;
pub mod constants;
pub mod criteria;
pub mod desk;
mod error;
pub mod lookup;
pub mod master;
pub mod models;
pub mod notify;
pub mod record;
pub mod search;
pub mod steps;
pub mod upsert;
pub mod validation;
pub mod wizard;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::Credentials;
pub use backend::{AuthApi, MasterDataApi, PatientApi};
pub use busy::{BusyCounter, BusyGuard};
pub use criteria::{AdvancedSearchForm, PatientSearchCriteria};
pub use desk::Desk;
pub use error::{BackendError, BackendResult, ValidationErrors};
pub use notify::{Notification, NotificationLog, Notifier, Severity, TracingNotifier};
pub use record::{load_patient, CurrentPatient};
pub use search::{classify, KeywordType, SearchKeyword};
pub use upsert::{EntityKind, EntityRecord, EntityRequest, Operation, Upsert};
pub use wizard::{IntakeWizard, Navigation, WizardStep};
