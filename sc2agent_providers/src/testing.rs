use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::time::Instant;

use crate::error::TransportError;
use crate::transport::{ChatTransport, HttpReply};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub api_key: String,
    pub body: Value,
    pub at: Instant,
}

/// Replays scripted outcomes in order and records every request it sees.
///
/// Once the script runs out every further call is a transport failure.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<HttpReply, String>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, status: u16, body: impl Into<String>) -> Self {
        self.push(Ok(HttpReply {
            status,
            body: body.into(),
        }))
    }

    pub fn answer(self, answer: &str, conversation_id: Option<&str>) -> Self {
        let body = serde_json::json!({
            "answer": answer,
            "conversation_id": conversation_id,
        });
        self.reply(200, body.to_string())
    }

    pub fn fail(self, message: &str) -> Self {
        self.push(Err(message.to_string()))
    }

    fn push(self, outcome: Result<HttpReply, String>) -> Self {
        self.script.lock().unwrap().push_back(outcome);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn bodies(&self) -> Vec<Value> {
        self.requests().into_iter().map(|r| r.body).collect()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &Value,
    ) -> Result<HttpReply, TransportError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            api_key: api_key.to_string(),
            body: body.clone(),
            at: Instant::now(),
        });
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(TransportError::Other(message)),
            None => Err(TransportError::Other("connection refused".to_string())),
        }
    }
}
