/// Errors raised while building a [`crate::FrontDeskClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid API base URL {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },
    #[error("invalid client configuration: {0}")]
    InvalidInput(String),
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
