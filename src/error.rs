// Fetch failure taxonomy

use thiserror::Error;

/// Failures from fetching the runtime-data payload. `Http` is the only
/// variant carrying a status; transport, JSON, and shape failures surface
/// without one.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("upstream returned {status} {status_text}")]
    Http { status: u16, status_text: String },

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("malformed payload: {0}")]
    Validation(String),
}

impl FetchError {
    /// HTTP status code, when the upstream answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
