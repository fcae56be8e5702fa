//! Shared library for the AI tutor services.
//!
//! This crate provides the configuration, wire types, prompt templates and the
//! completion gateway used by the HTTP API and the chat client.

pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod prompt;
pub mod secrets;

pub use config::{Config, Provider, RateLimitConfig};
pub use error::{Error, Result};
pub use gateway::{BedrockGateway, CompletionGateway, GeminiGateway};
pub use models::{
    iso_timestamp, ChatRequest, ChatResponse, ErrorResponse, HealthResponse, Sender, TutorRequest,
    TutorResponse,
};
pub use prompt::{compose_chat_prompt, compose_subject_prompt};
pub use secrets::{get_secret, parse_api_key_secret};
