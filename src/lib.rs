//! Beam relay — turns Soracom Beam USSD notifications into watering
//! requests for the herb garden controller.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod proxy;

/// Beam notifications are a few hundred bytes; anything near this is not one.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Shared application state passed to handlers.
pub struct AppState {
    pub config: config::Config,
    pub upstream: Arc<dyn proxy::relay::Fetch>,
}

impl AppState {
    pub fn new(config: config::Config, upstream: Arc<dyn proxy::relay::Fetch>) -> Self {
        Self { config, upstream }
    }
}

/// Build the HTTP surface of the relay.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route(
            "/water/herbs",
            post(proxy::handler::water_handler).fallback(proxy::handler::method_not_allowed),
        )
        .fallback(proxy::handler::not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
}

/// Middleware: injects a unique X-Request-Id into every response.
async fn request_id_middleware(
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let req_id = uuid::Uuid::new_v4().to_string();
    let mut resp = next.run(req).await;
    if let Ok(val) = axum::http::HeaderValue::from_str(&req_id) {
        resp.headers_mut().insert("x-request-id", val);
    }
    resp
}
