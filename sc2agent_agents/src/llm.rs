use async_trait::async_trait;
use sc2agent_core::{Agent, AgentKind};
use sc2agent_providers::{ChatTransport, CompletionsClient, HttpTransport};
use std::time::Duration;
use tokio::time::sleep;

use crate::window::DialogueWindow;

/// Agent backed by an OpenAI-compatible chat-completions model.
///
/// Used for both the `gpt` and `glm2` kinds; they differ only in endpoint and model.
pub struct LlmAgent<T = HttpTransport> {
    kind: AgentKind,
    client: CompletionsClient<T>,
    window: DialogueWindow,
    request_delay: Duration,
}

impl<T: ChatTransport> LlmAgent<T> {
    #[must_use]
    pub const fn new(
        kind: AgentKind,
        client: CompletionsClient<T>,
        window: DialogueWindow,
        request_delay: Duration,
    ) -> Self {
        Self {
            kind,
            client,
            window,
            request_delay,
        }
    }

    #[must_use]
    pub const fn window(&self) -> &DialogueWindow {
        &self.window
    }
}

#[async_trait]
impl<T: ChatTransport> Agent for LlmAgent<T> {
    fn kind(&self) -> AgentKind {
        self.kind
    }

    async fn act(&mut self, observation: &str) -> anyhow::Result<String> {
        if !self.request_delay.is_zero() {
            sleep(self.request_delay).await;
        }

        let messages = self.window.messages_for(observation);
        let answer = self.client.chat(&messages).await?;
        self.window.record(observation, answer.as_str());
        Ok(answer)
    }
}
