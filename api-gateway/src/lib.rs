//! HTTP API for the AI tutor.
//!
//! The same router is served over TCP by `tutor_server` and behind API Gateway
//! by `tutor_lambda`:
//!
//! ```text
//! request → trace → hardening headers → CORS → panic guard → rate limit → route
//! ```

pub mod error;
pub mod extract;
pub mod rate_limit;
pub mod routes;
pub mod security;

pub use error::ApiError;
pub use rate_limit::{Decision, RateLimiter};

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::Router;
use shared::config::BODY_LIMIT_BYTES;
use shared::{CompletionGateway, Config};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn CompletionGateway>,
}

/// Build the full router with middleware.
pub fn build_router(gateway: Arc<dyn CompletionGateway>, config: &Config) -> shared::Result<Router> {
    let limiter = Arc::new(RateLimiter::new(config.rate_limit));
    let cors = security::cors_layer(&config.client_url)?;

    Ok(routes::api_routes()
        .fallback(routes::not_found)
        .with_state(AppState { gateway })
        .layer(middleware::from_fn_with_state(
            limiter,
            rate_limit::rate_limit_middleware,
        ))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(middleware::from_fn(security::security_headers))
        .layer(TraceLayer::new_for_http()))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::Unexpected(format!("Handler panicked: {}", detail)).into_response()
}
