//! Error taxonomy for collection fetches.

use thiserror::Error;

/// Substring of a validation message that marks a page index beyond the
/// available data. Backends report it as `invalid request: page: ...`.
pub const PAGE_OUT_OF_RANGE_PATTERN: &str = "invalid request: page:";

/// Errors a page or detail fetch can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Network-level failure (connect, reset, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with an unexpected status.
    #[error("server returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or the status reason.
        message: String,
    },

    /// The server rejected the request parameters.
    #[error("{message}")]
    Validation {
        /// Message from the error body.
        message: String,
    },

    /// The requested resource does not exist.
    #[error("{kind} not found: {name}")]
    NotFound {
        /// Resource noun, e.g. `router`.
        kind: String,
        /// Requested name.
        name: String,
    },

    /// The response body did not have the expected shape.
    #[error("decoding error: {0}")]
    Decode(String),
}

impl FetchError {
    /// Whether this error is the backend's "page beyond available data" signal.
    ///
    /// Recognised by [`PAGE_OUT_OF_RANGE_PATTERN`] in a validation message.
    #[must_use]
    pub fn is_page_out_of_range(&self) -> bool {
        matches!(self, Self::Validation { message } if message.contains(PAGE_OUT_OF_RANGE_PATTERN))
    }

    /// Whether retrying the same request may succeed.
    ///
    /// Transport failures, 5xx answers and undecodable bodies are retryable;
    /// validation and not-found answers are deterministic.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Decode(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Validation { .. } | Self::NotFound { .. } => false,
        }
    }

    /// Whether this is a missing-resource answer.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
