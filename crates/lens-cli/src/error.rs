//! CLI error types.

use lens_client::ClientError;
use lens_mock::MockError;
use lens_proto::FetchError;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The API request failed.
    #[error("request failed: {0}")]
    Fetch(FetchError),

    /// The named resource does not exist.
    #[error("{kind} not found: {name}")]
    NotFound {
        /// Resource noun.
        kind: String,
        /// Requested name.
        name: String,
    },

    /// The mock server failed.
    #[error("mock server error: {0}")]
    Server(#[from] MockError),

    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<FetchError> for CliError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::NotFound { kind, name } => Self::NotFound { kind, name },
            other => Self::Fetch(other),
        }
    }
}

impl From<ClientError> for CliError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Config(msg) => Self::Config(msg),
            ClientError::Fetch(e) => e.into(),
            ClientError::ViewClosed => Self::Config(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_error_display_not_found() {
        let err = CliError::from(FetchError::NotFound {
            kind: "router".into(),
            name: "web@file".into(),
        });
        assert_eq!(err.to_string(), "router not found: web@file");
    }

    #[test]
    fn cli_error_keeps_fetch_message() {
        let err = CliError::from(FetchError::Transport("connection refused".into()));
        assert!(matches!(err, CliError::Fetch(_)));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn cli_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err = CliError::from(io_err);
        assert!(matches!(cli_err, CliError::Io(_)));
    }
}
