use async_trait::async_trait;
use sc2agent_providers::{ChatTransport, HttpReply, TransportError};
use serde_json::Value;
use std::sync::Mutex;

/// Answers every request with the same reply and keeps the request bodies.
#[derive(Debug)]
pub struct FixedTransport {
    reply: HttpReply,
    bodies: Mutex<Vec<Value>>,
}

impl FixedTransport {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            reply: HttpReply {
                status,
                body: body.into(),
            },
            bodies: Mutex::new(Vec::new()),
        }
    }

    pub fn bodies(&self) -> Vec<Value> {
        self.bodies.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for FixedTransport {
    async fn post_json(
        &self,
        _url: &str,
        _api_key: &str,
        body: &Value,
    ) -> Result<HttpReply, TransportError> {
        self.bodies.lock().unwrap().push(body.clone());
        Ok(self.reply.clone())
    }
}
