//! JSON bodies returned by the relay and the writer that serialises them.

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use serde::{Deserialize, Serialize};

/// Body written when the response payload itself cannot be serialised.
pub const FALLBACK_ERROR_BODY: &str = "{\"error\": \"unable to build JSON response\"}";

pub const THANK_YOU: &str = "Thank You";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn thank_you() -> Self {
        Self {
            status: THANK_YOU.to_string(),
        }
    }
}

pub fn respond_with_error(status: StatusCode, message: impl Into<String>) -> Response {
    respond_with_json(
        status,
        &ErrorResponse {
            error: message.into(),
        },
    )
}

pub fn respond_with_status(status: StatusCode, message: impl Into<String>) -> Response {
    respond_with_json(
        status,
        &StatusResponse {
            status: message.into(),
        },
    )
}

/// Serialise `payload` with `status`. A payload that fails to serialise
/// turns into a 500 carrying [`FALLBACK_ERROR_BODY`].
pub fn respond_with_json<T: Serialize + ?Sized>(status: StatusCode, payload: &T) -> Response {
    let (status, body) = match serde_json::to_vec(payload) {
        Ok(bytes) => (status, Body::from(bytes)),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialise response body");
            (StatusCode::INTERNAL_SERVER_ERROR, Body::from(FALLBACK_ERROR_BODY))
        }
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}
