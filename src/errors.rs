use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::models::response::respond_with_error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The request body could not be read, or was empty.
    #[error("{0}")]
    ClientInput(String),

    /// The body is not a valid Beam payload, or its value is not a duration.
    /// Reported as a 500 for compatibility with existing Beam configurations.
    #[error("{0}")]
    Decode(String),

    /// The watering controller could not be reached.
    #[error("{message}")]
    UpstreamUnavailable {
        status: Option<StatusCode>,
        message: String,
    },

    /// The watering controller answered with a non-success status.
    #[error("upstream responded with {status}")]
    UpstreamStatus { status: StatusCode, body: String },

    /// The controller's response body could not be read.
    #[error("{0}")]
    UpstreamRead(String),

    #[error("no route for {0}")]
    NotFound(String),

    #[error("method {0} not allowed")]
    MethodNotAllowed(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ClientInput(_) => StatusCode::BAD_REQUEST,
            AppError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::UpstreamUnavailable { status, .. } => {
                status.unwrap_or(StatusCode::SERVICE_UNAVAILABLE)
            }
            AppError::UpstreamStatus { status, .. } => *status,
            AppError::UpstreamRead(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            AppError::UpstreamStatus { body, .. } => {
                tracing::warn!(status = %status, upstream_body = %body, "watering upstream rejected activation");
            }
            AppError::NotFound(_) | AppError::MethodNotAllowed(_) => {
                tracing::debug!(status = %status, error = %self, "unroutable request");
            }
            _ if status.is_server_error() => {
                tracing::error!(status = %status, error = %self, "request failed");
            }
            _ => {
                tracing::warn!(status = %status, error = %self, "request rejected");
            }
        }

        respond_with_error(status, self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::ClientInput("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Decode("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::UpstreamRead("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::NotFound("/x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::MethodNotAllowed("GET".into()).status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn test_unavailable_without_status_is_503() {
        let err = AppError::UpstreamUnavailable {
            status: None,
            message: "connection refused".into(),
        };
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_unavailable_with_status_keeps_it() {
        let err = AppError::UpstreamUnavailable {
            status: Some(StatusCode::BAD_GATEWAY),
            message: "redirect loop".into(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_upstream_status_passes_through() {
        let err = AppError::UpstreamStatus {
            status: StatusCode::CONFLICT,
            body: "already watering".into(),
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "upstream responded with 409 Conflict");
    }

    #[tokio::test]
    async fn test_into_response_is_json_error() {
        let resp = AppError::Decode("expected value at line 1 column 1".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.headers()["content-type"], "application/json");
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "expected value at line 1 column 1");
    }
}
