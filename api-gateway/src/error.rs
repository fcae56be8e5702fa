//! HTTP error responses.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use shared::ErrorResponse;
use thiserror::Error;

/// Errors a handler or middleware can answer with.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request body had no usable `message`.
    #[error("Message is required")]
    MissingMessage,

    /// The completion gateway failed; carries the upstream message.
    #[error("Failed to generate response: {0}")]
    Generation(String),

    /// No route matched.
    #[error("Endpoint not found")]
    NotFound,

    /// Client exceeded its request budget.
    #[error("Too many requests")]
    RateLimited { retry_after_secs: u64 },

    /// Anything else; details are logged, never returned.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingMessage => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Generation(_) | ApiError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            ApiError::MissingMessage => ErrorResponse::new("Message is required"),
            ApiError::Generation(details) => {
                ErrorResponse::with_details("Failed to generate response", details)
            }
            ApiError::NotFound => ErrorResponse::new("Endpoint not found"),
            ApiError::RateLimited { .. } => {
                ErrorResponse::new("Too many requests, please try again later.")
            }
            ApiError::Unexpected(_) => ErrorResponse::new("Something went wrong!"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Unexpected(ref detail) = self {
            tracing::error!(error = %detail, "Unhandled request error");
        }

        let mut response = (self.status_code(), Json(self.body())).into_response();
        if let ApiError::RateLimited { retry_after_secs } = self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
        }
        response
    }
}
