//! Outbound half of the relay: one GET to the watering controller per
//! activation, classified into a [`RelayOutcome`].

use async_trait::async_trait;
use axum::http::StatusCode;
use bytes::Bytes;

use crate::errors::AppError;

/// A fully read upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// No usable response. `status` is set only when the transport layer
    /// reported one together with the error.
    Transport {
        status: Option<StatusCode>,
        message: String,
    },
    /// A response arrived but its body could not be read.
    Body { status: StatusCode, message: String },
}

/// Capability to perform a single GET and read the body into memory.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedResponse, FetchError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    Success { status: StatusCode, body: Bytes },
    UpstreamError { status: StatusCode, body: Bytes },
    TransportFailure {
        status: Option<StatusCode>,
        message: String,
    },
    BodyUnreadable { status: StatusCode, message: String },
}

impl RelayOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RelayOutcome::Success { .. })
    }

    /// Collapse into the upstream body on success, or the error to report.
    pub fn into_result(self) -> Result<Bytes, AppError> {
        match self {
            RelayOutcome::Success { body, .. } => Ok(body),
            RelayOutcome::UpstreamError { status, body } => Err(AppError::UpstreamStatus {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            }),
            RelayOutcome::TransportFailure { status, message } => {
                Err(AppError::UpstreamUnavailable { status, message })
            }
            RelayOutcome::BodyUnreadable { message, .. } => Err(AppError::UpstreamRead(message)),
        }
    }
}

/// `{base_url}/seconds/{seconds}`, with no escaping or normalisation.
pub fn assemble_water_url(base_url: &str, seconds: u64) -> String {
    format!("{}/seconds/{}", base_url, seconds)
}

/// Ask the controller at `base_url` to water for `seconds`.
#[tracing::instrument(skip(fetcher))]
pub async fn dispatch(fetcher: &dyn Fetch, base_url: &str, seconds: u64) -> RelayOutcome {
    let url = assemble_water_url(base_url, seconds);
    tracing::debug!(%url, "relaying activation");

    match fetcher.fetch(&url).await {
        Ok(FetchedResponse { status, body }) => {
            tracing::info!(
                %url,
                status = %status,
                body = %String::from_utf8_lossy(&body),
                "watering upstream responded"
            );
            if status.is_success() {
                RelayOutcome::Success { status, body }
            } else {
                RelayOutcome::UpstreamError { status, body }
            }
        }
        Err(FetchError::Transport { status, message }) => {
            tracing::warn!(%url, ?status, error = %message, "watering upstream unreachable");
            RelayOutcome::TransportFailure { status, message }
        }
        Err(FetchError::Body { status, message }) => {
            tracing::warn!(%url, status = %status, error = %message, "failed to read upstream body");
            RelayOutcome::BodyUnreadable { status, message }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Replays a canned result and remembers every URL it was asked for.
    struct CannedFetch {
        result: Result<FetchedResponse, FetchError>,
        seen: Mutex<Vec<String>>,
    }

    impl CannedFetch {
        fn new(result: Result<FetchedResponse, FetchError>) -> Self {
            Self {
                result,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Fetch for CannedFetch {
        async fn fetch(&self, url: &str) -> Result<FetchedResponse, FetchError> {
            self.seen.lock().unwrap().push(url.to_string());
            self.result.clone()
        }
    }

    fn ok(status: StatusCode, body: &'static str) -> Result<FetchedResponse, FetchError> {
        Ok(FetchedResponse {
            status,
            body: Bytes::from_static(body.as_bytes()),
        })
    }

    #[test]
    fn test_assemble_water_url() {
        assert_eq!(
            assemble_water_url("http://example.test", 1_234_567),
            "http://example.test/seconds/1234567"
        );
        assert_eq!(assemble_water_url("", 0), "/seconds/0");
        // Trailing slashes are not normalised.
        assert_eq!(
            assemble_water_url("http://example.test/", 5),
            "http://example.test//seconds/5"
        );
    }

    #[tokio::test]
    async fn test_success_calls_once() {
        let fetch = CannedFetch::new(ok(StatusCode::OK, "watering for 30s"));
        let outcome = dispatch(&fetch, "http://garden", 30).await;

        assert!(outcome.is_success());
        assert_eq!(*fetch.seen.lock().unwrap(), vec!["http://garden/seconds/30".to_string()]);
        assert_eq!(outcome.into_result().unwrap(), Bytes::from_static(b"watering for 30s"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_upstream_error() {
        let fetch = CannedFetch::new(ok(StatusCode::CONFLICT, "busy"));
        let outcome = dispatch(&fetch, "http://garden", 30).await;

        assert_eq!(
            outcome,
            RelayOutcome::UpstreamError {
                status: StatusCode::CONFLICT,
                body: Bytes::from_static(b"busy"),
            }
        );
        let err = outcome.into_result().unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_transport_failure_without_status_is_503() {
        let fetch = CannedFetch::new(Err(FetchError::Transport {
            status: None,
            message: "connection refused".into(),
        }));
        let err = dispatch(&fetch, "http://garden", 1).await.into_result().unwrap_err();
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.to_string(), "connection refused");
    }

    #[tokio::test]
    async fn test_transport_failure_with_status_uses_it() {
        let fetch = CannedFetch::new(Err(FetchError::Transport {
            status: Some(StatusCode::TOO_MANY_REQUESTS),
            message: "rejected".into(),
        }));
        let err = dispatch(&fetch, "http://garden", 1).await.into_result().unwrap_err();
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_body_failure_is_500() {
        let fetch = CannedFetch::new(Err(FetchError::Body {
            status: StatusCode::OK,
            message: "connection reset".into(),
        }));
        let err = dispatch(&fetch, "http://garden", 1).await.into_result().unwrap_err();
        assert!(matches!(err, AppError::UpstreamRead(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
