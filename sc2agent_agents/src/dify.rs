use async_trait::async_trait;
use sc2agent_core::{Agent, AgentKind};
use sc2agent_providers::{ChatTransport, DifyMultiTurnClient, DifySingleTurnClient, HttpTransport};
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

enum Session<T> {
    Single(DifySingleTurnClient<T>),
    Multi(DifyMultiTurnClient<T>),
}

/// Agent that forwards each observation to a Dify app as a chat query.
pub struct DifyAgent<T = HttpTransport> {
    session: Session<T>,
    request_delay: Duration,
}

impl<T: ChatTransport> DifyAgent<T> {
    #[must_use]
    pub const fn single_turn(client: DifySingleTurnClient<T>, request_delay: Duration) -> Self {
        Self {
            session: Session::Single(client),
            request_delay,
        }
    }

    #[must_use]
    pub const fn multi_turn(client: DifyMultiTurnClient<T>, request_delay: Duration) -> Self {
        Self {
            session: Session::Multi(client),
            request_delay,
        }
    }

    #[must_use]
    pub fn conversation_id(&self) -> Option<&str> {
        match &self.session {
            Session::Single(_) => None,
            Session::Multi(client) => client.conversation_id(),
        }
    }
}

#[async_trait]
impl<T: ChatTransport> Agent for DifyAgent<T> {
    fn kind(&self) -> AgentKind {
        AgentKind::Dify
    }

    async fn act(&mut self, observation: &str) -> anyhow::Result<String> {
        if !self.request_delay.is_zero() {
            debug!("Waiting {:?} before Dify request", self.request_delay);
            sleep(self.request_delay).await;
        }

        match &mut self.session {
            Session::Single(client) => Ok(client.query(observation).await),
            Session::Multi(client) => Ok(client.query(observation).await?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FixedTransport;
    use sc2agent_core::FALLBACK_ANSWER;
    use sc2agent_providers::{ClientConfig, Example};
    use std::sync::Arc;

    fn config() -> ClientConfig {
        ClientConfig::new(
            "gpt-4o-mini",
            "app-test",
            "https://dify.test/v1",
            0.0,
            "You are a StarCraft II commander",
            Example::new("Status?", "All units ready"),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn single_turn_agent_returns_answer_after_delay() {
        let transport = Arc::new(FixedTransport::new(
            200,
            r#"{"answer": "<BUILD PYLON>", "conversation_id": "c1"}"#,
        ));
        let client = DifySingleTurnClient::with_transport(config(), transport.clone());
        let mut agent = DifyAgent::single_turn(client, Duration::from_millis(200));

        let started = tokio::time::Instant::now();
        let action = agent.act("Minerals: 400").await.unwrap();
        assert_eq!(action, "<BUILD PYLON>");
        assert!(started.elapsed() >= Duration::from_millis(200));
        assert_eq!(agent.conversation_id(), None);
        assert_eq!(transport.bodies()[0]["query"], "Minerals: 400");
    }

    #[tokio::test]
    async fn multi_turn_agent_keeps_conversation() {
        let transport = Arc::new(FixedTransport::new(
            200,
            r#"{"answer": "<TRAIN PROBE>", "conversation_id": "c1"}"#,
        ));
        let client = DifyMultiTurnClient::with_transport(config(), transport.clone());
        let mut agent = DifyAgent::multi_turn(client, Duration::ZERO);

        agent.act("step 1").await.unwrap();
        agent.act("step 2").await.unwrap();

        assert_eq!(agent.conversation_id(), Some("c1"));
        assert_eq!(transport.bodies()[1]["conversation_id"], "c1");
        assert_eq!(agent.kind(), AgentKind::Dify);
    }

    #[tokio::test]
    async fn error_status_yields_fallback() {
        let transport = Arc::new(FixedTransport::new(502, "bad gateway"));
        let client = DifyMultiTurnClient::with_transport(config(), transport);
        let mut agent = DifyAgent::multi_turn(client, Duration::ZERO);

        assert_eq!(agent.act("step").await.unwrap(), FALLBACK_ANSWER);
    }
}
