use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::Response;

use crate::errors::AppError;
use crate::models::notification::ActivationNotification;
use crate::models::response::{respond_with_status, THANK_YOU};
use crate::proxy::relay;
use crate::AppState;

/// `POST /water/herbs`: decode the Beam notification, relay the requested
/// watering duration, and thank the caller once the controller accepted it.
#[tracing::instrument(skip(state, body))]
pub async fn water_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AppError> {
    let body = body.map_err(|e| AppError::ClientInput(e.body_text()))?;
    if body.is_empty() {
        return Err(AppError::ClientInput("empty request body".to_string()));
    }

    let notification = ActivationNotification::from_json(&body)?;
    tracing::info!(
        imsi = %notification.imsi,
        coding_scheme = notification.ussd_data_coding_scheme,
        ussd_string = %notification.ussd_string,
        value = %notification.value,
        "beam notification received"
    );

    let seconds = notification.activation_seconds()?;

    relay::dispatch(
        state.upstream.as_ref(),
        &state.config.watering_upstream,
        seconds,
    )
    .await
    .into_result()?;

    Ok(respond_with_status(StatusCode::ACCEPTED, THANK_YOU))
}

pub async fn method_not_allowed(method: Method) -> AppError {
    AppError::MethodNotAllowed(method.to_string())
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
