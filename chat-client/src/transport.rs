//! Transport for the chat endpoint.

use async_trait::async_trait;
use reqwest::Client;
use shared::{ChatRequest, ChatResponse, ErrorResponse};

use crate::ClientError;

/// Delivers one chat request and returns the decoded reply.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError>;
}

/// `POST {base_url}/api/chat` over HTTP. No timeout: an exchange always runs to completion.
pub struct HttpTransport {
    client: Client,
    chat_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self {
            client: Client::new(),
            chat_url: format!("{}/api/chat", base_url),
        })
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        let response = self.client.post(&self.chat_url).json(request).send().await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let error = serde_json::from_slice::<ErrorResponse>(&body)
                .map(|e| match e.details {
                    Some(details) => format!("{} ({})", e.error, details),
                    None => e.error,
                })
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            return Err(ClientError::Status {
                status: status.as_u16(),
                error,
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}
