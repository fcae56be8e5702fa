//! Configuration management for the tutor server.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::{Error, Result};

/// Default model for each provider.
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_BEDROCK_MODEL: &str = "anthropic.claude-3-haiku-20240307-v1:0";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Request bodies above this size are rejected.
pub const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Which upstream text-generation service to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    Bedrock,
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Provider::Gemini),
            "bedrock" => Ok(Provider::Bedrock),
            other => Err(Error::Config(format!(
                "COMPLETION_PROVIDER must be 'gemini' or 'bedrock', got '{}'",
                other
            ))),
        }
    }
}

/// Fixed-window rate limit applied per client address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(15 * 60),
        }
    }
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen port
    pub port: u16,
    /// The single origin allowed by CORS
    pub client_url: String,
    /// Upstream provider
    pub provider: Provider,
    /// Upstream model id
    pub model: String,
    /// Gemini API key, when supplied directly
    pub api_key: Option<String>,
    /// Secrets Manager ARN holding the Gemini API key
    pub api_key_secret_arn: Option<String>,
    /// Gemini API base URL
    pub gemini_base_url: String,
    /// Timeout for a single upstream call
    pub upstream_timeout: Duration,
    /// Per-client rate limit
    pub rate_limit: RateLimitConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset. A Gemini setup without any credential
    /// source is rejected here so the process fails before serving requests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let provider = match get("COMPLETION_PROVIDER") {
            Some(value) => value.parse()?,
            None => Provider::Gemini,
        };

        let model = get("COMPLETION_MODEL").unwrap_or_else(|| match provider {
            Provider::Gemini => DEFAULT_GEMINI_MODEL.to_string(),
            Provider::Bedrock => DEFAULT_BEDROCK_MODEL.to_string(),
        });

        let api_key = get("GEMINI_API_KEY");
        let api_key_secret_arn = get("GEMINI_API_KEY_SECRET_ARN");
        if provider == Provider::Gemini && api_key.is_none() && api_key_secret_arn.is_none() {
            return Err(Error::Config(
                "GEMINI_API_KEY (or GEMINI_API_KEY_SECRET_ARN) must be set".to_string(),
            ));
        }

        let defaults = RateLimitConfig::default();
        let rate_limit = RateLimitConfig {
            max_requests: parse_var(&get, "RATE_LIMIT_MAX")?.unwrap_or(defaults.max_requests),
            window: parse_var(&get, "RATE_LIMIT_WINDOW_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.window),
        };
        if rate_limit.max_requests == 0 || rate_limit.window.is_zero() {
            return Err(Error::Config(
                "RATE_LIMIT_MAX and RATE_LIMIT_WINDOW_SECS must be positive".to_string(),
            ));
        }

        let upstream_timeout =
            Duration::from_secs(parse_var(&get, "UPSTREAM_TIMEOUT_SECS")?.unwrap_or(120));
        if upstream_timeout.is_zero() {
            return Err(Error::Config(
                "UPSTREAM_TIMEOUT_SECS must be positive".to_string(),
            ));
        }

        Ok(Self {
            port: parse_var(&get, "PORT")?.unwrap_or(5000),
            client_url: get("CLIENT_URL").unwrap_or_else(|| "http://localhost:5173".to_string()),
            provider,
            model,
            api_key,
            api_key_secret_arn,
            gemini_base_url: get("GEMINI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            upstream_timeout,
            rate_limit,
        })
    }
}

fn parse_var<T, G>(get: &G, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| Error::Config(format!("Invalid {}: '{}' ({})", key, raw, e)))
        })
        .transpose()
}
