use sc2agent_core::FALLBACK_ANSWER;
use tracing::{debug, error, info};

use super::{ClientConfig, parse_reply};
use crate::error::{QueryError, TransportError};
use crate::transport::{ChatTransport, HttpTransport};

const DEFAULT_USER: &str = "unique_user_id";

/// Dify client that keeps one dialogue going across calls.
///
/// The conversation id returned by the server is stored after every
/// successful call and sent with the next request. Failed calls leave it
/// untouched. Each query is a single request; nothing is retried.
pub struct DifyMultiTurnClient<T = HttpTransport> {
    config: ClientConfig,
    transport: T,
    conversation_id: Option<String>,
}

impl DifyMultiTurnClient<HttpTransport> {
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: ChatTransport> DifyMultiTurnClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        info!("Creating Dify multi-turn client for {}", config.api_base);
        Self {
            config,
            transport,
            conversation_id: None,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// Forget the current dialogue; the next query starts a new one.
    pub fn reset(&mut self) {
        self.conversation_id = None;
    }

    /// Send one turn and return the answer.
    ///
    /// A non-200 status is logged and answered with [`FALLBACK_ANSWER`].
    /// Transport failures and unreadable bodies are returned as errors.
    pub async fn query(&mut self, user_input: &str) -> Result<String, QueryError> {
        match self.try_query(user_input).await {
            Err(QueryError::Status { status, body }) => {
                error!("Dify API error: {status}, {body}");
                Ok(FALLBACK_ANSWER.to_string())
            }
            other => other,
        }
    }

    /// Like [`Self::query`], but every failure is reported as an error.
    pub async fn try_query(&mut self, user_input: &str) -> Result<String, QueryError> {
        let conversation_id = self.conversation_id.as_deref();
        let body = self
            .config
            .request_body(user_input, DEFAULT_USER, conversation_id);

        debug!(
            "Sending Dify chat message (conversation: {:?})",
            self.conversation_id
        );
        let reply = self
            .transport
            .post_json(&self.config.endpoint(), &self.config.api_key, &body)
            .await?;
        let response = parse_reply(reply)?;

        if response.conversation_id != self.conversation_id {
            debug!(
                "Conversation id changed: {:?} -> {:?}",
                self.conversation_id, response.conversation_id
            );
        }
        self.conversation_id = response.conversation_id;

        Ok(response.answer)
    }
}
