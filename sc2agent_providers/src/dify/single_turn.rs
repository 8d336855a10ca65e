use sc2agent_core::FALLBACK_ANSWER;
use serde_json::Value;
use tracing::{error, info};

use super::{ClientConfig, parse_reply};
use crate::error::{QueryError, TransportError};
use crate::retry::{Backoff, retry_with_backoff};
use crate::transport::{ChatTransport, HttpTransport};

const DEFAULT_USER: &str = "sc2_test";

pub const DEFAULT_MAX_RETRIES: usize = 5;

/// Stateless Dify client with bounded retries.
///
/// Transport failures and unreadable bodies are retried with exponential
/// backoff; an error status from the server ends the query at once. No
/// conversation id is ever sent.
pub struct DifySingleTurnClient<T = HttpTransport> {
    config: ClientConfig,
    transport: T,
    backoff: Backoff,
    max_retries: usize,
}

impl DifySingleTurnClient<HttpTransport> {
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: ChatTransport> DifySingleTurnClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        info!("Creating Dify single-turn client for {}", config.api_base);
        Self {
            config,
            transport,
            backoff: Backoff::default(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    #[must_use]
    pub const fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Attempt budget used by [`Self::query`].
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn query(&self, user_input: &str) -> String {
        self.query_with_retries(user_input, self.max_retries).await
    }

    /// Send a query with at most `max_retries` attempts, collapsing every
    /// failure into [`FALLBACK_ANSWER`].
    pub async fn query_with_retries(&self, user_input: &str, max_retries: usize) -> String {
        match self.try_query_with_retries(user_input, max_retries).await {
            Ok(answer) => answer,
            Err(QueryError::Status { status, body }) => {
                error!("Dify API error: {status}, {body}");
                FALLBACK_ANSWER.to_string()
            }
            Err(e) => {
                error!("Maximum number of retries reached. The Dify API is not responding: {e}");
                FALLBACK_ANSWER.to_string()
            }
        }
    }

    pub async fn try_query_with_retries(
        &self,
        user_input: &str,
        max_retries: usize,
    ) -> Result<String, QueryError> {
        let body = self.config.request_body(user_input, DEFAULT_USER, None);
        let url = self.config.endpoint();

        retry_with_backoff(
            || self.send_once(&url, &body),
            max_retries,
            &self.backoff,
            QueryError::is_retryable,
        )
        .await
        .map_err(QueryError::from)
    }

    async fn send_once(&self, url: &str, body: &Value) -> Result<String, QueryError> {
        let reply = self
            .transport
            .post_json(url, &self.config.api_key, body)
            .await?;
        Ok(parse_reply(reply)?.answer)
    }
}
