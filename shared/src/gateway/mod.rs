//! Completion gateway: the boundary around the external text-generation service.
//!
//! One prompt in, one completion out. There is no caching, retrying or
//! streaming; every failure surfaces as [`Error::Upstream`].

mod bedrock;
mod gemini;

pub use bedrock::BedrockGateway;
pub use gemini::GeminiGateway;

use async_trait::async_trait;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, SdkConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::{Config, Provider};
use crate::{secrets, Error, Result};

/// A text-generation backend.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &str;

    /// Send `prompt` and return the first text completion.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Build the process-wide gateway handle described by `config`.
///
/// Resolves the credential up front so a misconfigured process fails at
/// startup instead of on the first request.
pub async fn connect(config: &Config) -> Result<Arc<dyn CompletionGateway>> {
    let gateway: Arc<dyn CompletionGateway> = match config.provider {
        Provider::Gemini => {
            let api_key = match (&config.api_key, &config.api_key_secret_arn) {
                (Some(key), _) => key.clone(),
                (None, Some(arn)) => {
                    let aws = load_aws_config(config.upstream_timeout).await;
                    let client = aws_sdk_secretsmanager::Client::new(&aws);
                    secrets::get_api_key(&client, arn).await?
                }
                (None, None) => {
                    return Err(Error::Config("No Gemini API key configured".to_string()))
                }
            };
            Arc::new(GeminiGateway::new(
                api_key,
                &config.model,
                &config.gemini_base_url,
                config.upstream_timeout,
            )?)
        }
        Provider::Bedrock => {
            let aws = load_aws_config(config.upstream_timeout).await;
            Arc::new(BedrockGateway::new(
                aws_sdk_bedrockruntime::Client::new(&aws),
                &config.model,
            ))
        }
    };

    info!(provider = gateway.name(), model = %config.model, "Completion gateway ready");
    Ok(gateway)
}

async fn load_aws_config(operation_timeout: Duration) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .timeout_config(
            TimeoutConfig::builder()
                .operation_timeout(operation_timeout)
                .build(),
        )
        .load()
        .await
}
