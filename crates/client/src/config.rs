//! Client configuration.
//!
//! Resolved once at startup and handed to [`crate::FrontDeskClient::new`]. Nothing in this
//! crate reads the environment; the binary reads `FRONTDESK_API_BASE_URL` and
//! `FRONTDESK_HTTP_TIMEOUT_SECS` and passes the raw values through [`ClientConfig::from_values`].

use crate::error::{ClientError, ClientResult};
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: Url,
    timeout: Duration,
}

impl ClientConfig {
    /// Create a new `ClientConfig`.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL is blank, does not parse, is not http(s), or when
    /// the timeout is zero.
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            return Err(ClientError::InvalidInput(
                "API base URL cannot be empty".into(),
            ));
        }
        if timeout.is_zero() {
            return Err(ClientError::InvalidInput(
                "HTTP timeout must be greater than zero".into(),
            ));
        }

        let base_url = Url::parse(trimmed).map_err(|e| ClientError::InvalidBaseUrl {
            url: trimmed.to_string(),
            message: e.to_string(),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl {
                url: trimmed.to_string(),
                message: "scheme must be http or https".into(),
            });
        }

        Ok(Self { base_url, timeout })
    }

    /// Builds the configuration from optional raw settings, falling back to the defaults.
    pub fn from_values(base_url: Option<&str>, timeout_secs: Option<&str>) -> ClientResult<Self> {
        let timeout_secs = match timeout_secs.map(str::trim).filter(|v| !v.is_empty()) {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                ClientError::InvalidInput(format!("HTTP timeout is not a number of seconds: {raw}"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        Self::new(
            base_url.unwrap_or(DEFAULT_API_BASE_URL),
            Duration::from_secs(timeout_secs),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute URL of an API path such as `/api/patients`.
    ///
    /// Any path prefix on the base URL is kept.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/{}", path.trim_start_matches('/')))
    }
}
