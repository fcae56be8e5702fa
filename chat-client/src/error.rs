//! Error types for the chat client.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection failure or unreadable body
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx status from the server
    #[error("Server returned {status}: {error}")]
    Status { status: u16, error: String },

    /// Body was not a valid chat response
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Body decoded but did not report success
    #[error("Server did not report success")]
    Rejected,

    #[error("Unknown subject: {0}")]
    UnknownSubject(String),

    #[error("Unknown grade: {0}")]
    UnknownGrade(String),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),
}
