//! Errors raised while talking to the content backend or the relay.

use thiserror::Error;

/// Result type for content source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

/// Content source errors.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The query was rejected before being sent.
    #[error("{0}")]
    InvalidQuery(String),

    /// Transport-level failure (DNS, connect, TLS, body read).
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The upstream answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The upstream body was not valid JSON.
    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),
}

impl SourceError {
    /// HTTP status reported by the upstream, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(err) | Self::Decode(err) => err.status().map(|s| s.as_u16()),
            Self::InvalidQuery(_) => None,
        }
    }
}

impl From<vitrine_core::CoreError> for SourceError {
    fn from(err: vitrine_core::CoreError) -> Self {
        Self::InvalidQuery(err.to_string())
    }
}
