//! Clients for the Dify `chat-messages` endpoint.
//!
//! Two flavours share one request format: [`DifyMultiTurnClient`] threads the
//! server-issued conversation id through successive calls, while
//! [`DifySingleTurnClient`] sends stateless queries and retries transport
//! failures with exponential backoff.

mod multi_turn;
mod single_turn;

pub use multi_turn::DifyMultiTurnClient;
pub use single_turn::{DEFAULT_MAX_RETRIES, DifySingleTurnClient};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::time::Duration;

use crate::error::QueryError;
use crate::transport::HttpReply;

/// A worked user/assistant exchange passed to the Dify app as prompt inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub user: String,
    pub assistant: String,
}

impl Example {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }
}

/// Settings shared by both Dify clients.
#[derive(Clone)]
pub struct ClientConfig {
    pub model_name: String,
    pub api_key: String,
    pub api_base: String,
    pub temperature: f32,
    pub system_prompt: String,
    pub example: Example,
    /// Caller identifier sent as `user`; each client has its own default.
    pub user: Option<String>,
    /// Per-request timeout; `None` leaves it to the HTTP client.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(
        model_name: impl Into<String>,
        api_key: impl Into<String>,
        api_base: impl Into<String>,
        temperature: f32,
        system_prompt: impl Into<String>,
        example: Example,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            api_key: api_key.into(),
            api_base: api_base.into(),
            temperature,
            system_prompt: system_prompt.into(),
            example,
            user: None,
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub(crate) fn endpoint(&self) -> String {
        format!("{}/chat-messages", self.api_base.trim_end_matches('/'))
    }

    pub(crate) fn request_body(
        &self,
        query: &str,
        default_user: &str,
        conversation_id: Option<&str>,
    ) -> Value {
        let mut body = json!({
            "query": query,
            "inputs": {
                "system": self.system_prompt,
                "user": self.example.user,
                "assistant": self.example.assistant,
            },
            "response_mode": "blocking",
            "user": self.user.as_deref().unwrap_or(default_user),
        });
        if let Some(id) = conversation_id.filter(|id| !id.is_empty()) {
            body["conversation_id"] = Value::from(id);
        }
        body
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("model_name", &self.model_name)
            .field("api_key", &"***")
            .field("api_base", &self.api_base)
            .field("temperature", &self.temperature)
            .field("system_prompt", &self.system_prompt)
            .field("example", &self.example)
            .field("user", &self.user)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    pub answer: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

pub(crate) fn parse_reply(reply: HttpReply) -> Result<ChatResponse, QueryError> {
    if !reply.is_ok() {
        return Err(QueryError::Status {
            status: reply.status,
            body: reply.body,
        });
    }
    serde_json::from_str(&reply.body).map_err(|e| QueryError::MalformedBody(e.to_string()))
}
