//! Wire types shared by the HTTP API and the chat client.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Author of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => f.write_str("user"),
            Sender::Ai => f.write_str("ai"),
        }
    }
}

/// Chat request payload for `POST /api/chat`.
///
/// Missing or `null` fields deserialize as empty strings; the handler decides
/// which of them are required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subject: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub grade: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub context: String,
}

/// Chat response payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub timestamp: String,
}

impl ChatResponse {
    /// A successful response stamped with the current time.
    pub fn success(response: impl Into<String>) -> Self {
        Self {
            success: true,
            response: response.into(),
            timestamp: iso_timestamp(),
        }
    }
}

/// Subject tutoring request payload for `POST /api/tutor/:subject`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TutorRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub grade: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub difficulty: String,
}

/// Subject tutoring response payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorResponse {
    pub success: bool,
    pub subject: String,
    pub response: String,
    pub timestamp: String,
}

impl TutorResponse {
    pub fn success(subject: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            success: true,
            subject: subject.into(),
            response: response.into(),
            timestamp: iso_timestamp(),
        }
    }
}

/// Error payload returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// Health check payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// Current UTC time as RFC 3339 with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`.
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
