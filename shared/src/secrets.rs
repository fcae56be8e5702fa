//! AWS Secrets Manager integration.

use aws_sdk_secretsmanager::Client as SecretsClient;
use std::collections::HashMap;
use std::sync::OnceLock;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{Error, Result};

/// Secret strings by ARN, fetched at most once per process.
static SECRET_STRINGS: OnceLock<RwLock<HashMap<String, String>>> = OnceLock::new();

fn secret_strings() -> &'static RwLock<HashMap<String, String>> {
    SECRET_STRINGS.get_or_init(Default::default)
}

/// JSON keys accepted when the API key secret is stored as an object.
const API_KEY_FIELDS: [&str; 3] = ["apiKey", "api_key", "GEMINI_API_KEY"];

/// Read the string value of `secret_arn`, served from memory after the first call.
pub async fn get_secret(client: &SecretsClient, secret_arn: &str) -> Result<String> {
    if let Some(cached) = secret_strings().read().await.get(secret_arn).cloned() {
        debug!(secret_arn, "Secret served from cache");
        return Ok(cached);
    }

    let output = client
        .get_secret_value()
        .secret_id(secret_arn)
        .send()
        .await
        .map_err(|e| Error::Aws(format!("Failed to read secret {}: {}", secret_arn, e)))?;
    let value = output
        .secret_string()
        .map(str::to_string)
        .ok_or_else(|| Error::Aws(format!("Secret {} is binary or empty", secret_arn)))?;

    secret_strings()
        .write()
        .await
        .insert(secret_arn.to_string(), value.clone());
    Ok(value)
}

/// Extract the API key from a secret string.
///
/// The secret is either the bare key or a JSON object carrying it under one of
/// the known field names.
pub fn parse_api_key_secret(secret: &str) -> Result<String> {
    let trimmed = secret.trim();
    if !trimmed.starts_with('{') {
        if trimmed.is_empty() {
            return Err(Error::Config("API key secret is empty".to_string()));
        }
        return Ok(trimmed.to_string());
    }

    let value: serde_json::Value = serde_json::from_str(trimmed)?;
    API_KEY_FIELDS
        .iter()
        .find_map(|field| value.get(field).and_then(|v| v.as_str()))
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(String::from)
        .ok_or_else(|| Error::Config("API key secret has no apiKey field".to_string()))
}

/// Fetch the Gemini API key stored under `secret_arn`.
pub async fn get_api_key(client: &SecretsClient, secret_arn: &str) -> Result<String> {
    let secret_string = get_secret(client, secret_arn).await?;
    parse_api_key_secret(&secret_string)
}
