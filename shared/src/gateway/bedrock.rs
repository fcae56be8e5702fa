//! Amazon Bedrock Converse client.

use async_trait::async_trait;
use aws_sdk_bedrockruntime::types::{ContentBlock, ConversationRole, ConverseOutput, Message};
use aws_sdk_bedrockruntime::Client as BedrockClient;

use super::CompletionGateway;
use crate::{Error, Result};

/// Bedrock runtime client bound to one model.
pub struct BedrockGateway {
    client: BedrockClient,
    model_id: String,
}

impl BedrockGateway {
    pub fn new(client: BedrockClient, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }
}

/// Concatenate the text blocks of the assistant message, if any.
fn output_text(output: Option<&ConverseOutput>) -> Option<String> {
    let message = output?.as_message().ok()?;
    let text: String = message
        .content()
        .iter()
        .filter_map(|block| block.as_text().ok())
        .map(String::as_str)
        .collect();
    Some(text).filter(|t| !t.trim().is_empty())
}

#[async_trait]
impl CompletionGateway for BedrockGateway {
    fn name(&self) -> &str {
        "bedrock"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(prompt.to_string()))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build Bedrock message: {}", e)))?;

        let response = self
            .client
            .converse()
            .model_id(&self.model_id)
            .messages(message)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("Bedrock request failed: {}", e)))?;

        output_text(response.output())
            .ok_or_else(|| Error::Upstream("Empty response from Bedrock".to_string()))
    }
}
