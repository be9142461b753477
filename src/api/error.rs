//! Error taxonomy for the Business Central client

use thiserror::Error;

/// Errors surfaced by the token provider, the transport and the API client.
///
/// Only a single 401 is recovered locally (refresh + one retry); every
/// variant here reaches the caller as-is.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No access token from the identity service, or still unauthorized
    /// after one refresh and retry
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Non-success response other than 401
    #[error("request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    /// Network or connection level failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Path or next link that cannot be resolved to a URL
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// Success body that is not the expected JSON shape
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_authentication(&self) -> bool {
        matches!(self, ApiError::Authentication(_))
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        ApiError::Transport(error.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::Decode(error.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
