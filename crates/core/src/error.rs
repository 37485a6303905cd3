use std::collections::BTreeMap;

/// Failure reported by a backend collaborator.
///
/// Every variant carries owned strings so the error can be cloned and handed to every
/// caller waiting on a shared token refresh.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("request to {path} failed: {message}")]
    Transport { path: String, message: String },
    #[error("{path} answered HTTP {actual}, expected HTTP {expected}")]
    UnexpectedStatus {
        path: String,
        expected: u16,
        actual: u16,
    },
    #[error("not authorised to call {path}")]
    Unauthorised { path: String },
    #[error("failed to decode response from {path}: {message}")]
    Decode { path: String, message: String },
    #[error("failed to refresh access token: {0}")]
    RefreshFailed(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Field-level validation failures for one form.
///
/// Keys are the form's field names; the first failing rule per field wins, matching how a
/// form shows a single helper text under each input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` against `field` unless that field already has an error.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// `Ok(())` when no field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in &self.fields {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
