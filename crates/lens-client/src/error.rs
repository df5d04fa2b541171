//! Client error types.

use lens_proto::FetchError;
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors raised by the client outside of a single fetch.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A fetch failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The collection view task is no longer running.
    #[error("collection view closed")]
    ViewClosed,
}
