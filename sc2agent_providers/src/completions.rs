use sc2agent_core::ChatMessage;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::info;

use crate::error::{QueryError, TransportError};
use crate::retry::{Backoff, retry_with_backoff};
use crate::transport::{ChatTransport, HttpTransport};

const MAX_ATTEMPTS: usize = 5;

/// Client for OpenAI-compatible `chat/completions` endpoints.
pub struct CompletionsClient<T = HttpTransport> {
    transport: T,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    backoff: Backoff,
}

impl CompletionsClient<HttpTransport> {
    pub fn new(
        api_key: String,
        base_url: String,
        model: String,
        temperature: f32,
        timeout: Option<Duration>,
    ) -> Result<Self, TransportError> {
        Ok(Self::with_transport(
            HttpTransport::new(timeout)?,
            api_key,
            base_url,
            model,
            temperature,
        ))
    }
}

impl<T: ChatTransport> CompletionsClient<T> {
    pub fn with_transport(
        transport: T,
        api_key: String,
        base_url: String,
        model: String,
        temperature: f32,
    ) -> Self {
        info!("Creating completions client: model={model}");
        Self {
            transport,
            api_key,
            base_url,
            model,
            temperature,
            backoff: Backoff::default(),
        }
    }

    #[must_use]
    pub const fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Helper method to send a single request
    async fn try_send(&self, request: &Value) -> Result<String, QueryError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let reply = self
            .transport
            .post_json(&url, &self.api_key, request)
            .await?;

        if !(200..300).contains(&reply.status) {
            return Err(QueryError::Status {
                status: reply.status,
                body: reply.body,
            });
        }

        let response: Value = serde_json::from_str(&reply.body)
            .map_err(|e| QueryError::MalformedBody(e.to_string()))?;

        response["choices"][0]["message"]["content"]
            .as_str()
            .map(ToString::to_string)
            .ok_or_else(|| QueryError::MalformedBody("missing content".to_string()))
    }

    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String, QueryError> {
        let request = json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
        });

        info!("Sending chat completion request: model={}", self.model);

        let content = retry_with_backoff(
            || self.try_send(&request),
            MAX_ATTEMPTS,
            &self.backoff,
            |_| true,
        )
        .await
        .map_err(QueryError::from)?;

        info!("Received chat completion response");
        Ok(content)
    }
}
