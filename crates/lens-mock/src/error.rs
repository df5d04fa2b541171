//! Error types for the mock API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lens_proto::FetchError;
use serde::Serialize;
use thiserror::Error;

/// Result type alias for mock API operations.
pub type MockResult<T> = Result<T, MockError>;

/// Errors the mock API can produce.
#[derive(Debug, Error)]
pub enum MockError {
    /// Failed to bind to the specified address.
    #[error("failed to bind to {0}: {1}")]
    BindFailed(std::net::SocketAddr, std::io::Error),

    /// Resource not found.
    #[error("{0} not found: {1}")]
    NotFound(String, String),

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Fixture could not be loaded.
    #[error("fixture error: {0}")]
    Fixture(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            Self::NotFound(_, _) => (StatusCode::NOT_FOUND, "not_found"),
            Self::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            Self::BindFailed(_, _) | Self::Fixture(_) | Self::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        };

        let json = serde_json::to_string(&body).unwrap_or_else(|_| {
            r#"{"error":"internal_error","message":"failed to serialize error"}"#.to_string()
        });

        (status, [("content-type", "application/json")], json).into_response()
    }
}

impl From<MockError> for FetchError {
    /// The error an HTTP client would classify from the same answer.
    fn from(err: MockError) -> Self {
        match err {
            MockError::NotFound(kind, name) => Self::NotFound { kind, name },
            MockError::InvalidRequest(_) => Self::Validation {
                message: err.to_string(),
            },
            MockError::BindFailed(_, _) | MockError::Fixture(_) | MockError::Internal(_) => Self::Status {
                status: 500,
                message: err.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for MockError {
    fn from(err: serde_json::Error) -> Self {
        Self::Fixture(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_not_found_error_response() {
        let err = MockError::NotFound("router".to_string(), "web@file".to_string());
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["error"], "not_found");
        assert_eq!(json["message"], "router not found: web@file");
    }

    #[tokio::test]
    async fn test_page_out_of_range_response_carries_pattern() {
        let err = MockError::InvalidRequest("page: 4 is beyond the last page (3)".to_string());
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let message = json["message"].as_str().unwrap();

        assert!(message.contains(lens_proto::PAGE_OUT_OF_RANGE_PATTERN));
    }

    #[tokio::test]
    async fn test_internal_error_response() {
        let err = MockError::Internal("something broke".to_string());
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_conversion_to_fetch_error() {
        let err = FetchError::from(MockError::InvalidRequest("page: 2 is beyond the last page (1)".into()));
        assert!(err.is_page_out_of_range());

        let err = FetchError::from(MockError::NotFound("service".into(), "api".into()));
        assert!(err.is_not_found());

        let err = FetchError::from(MockError::Internal("boom".into()));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = MockError::NotFound("middleware".to_string(), "auth".to_string());
        assert_eq!(err.to_string(), "middleware not found: auth");

        let err = MockError::InvalidRequest("bad param".to_string());
        assert_eq!(err.to_string(), "invalid request: bad param");
    }
}
