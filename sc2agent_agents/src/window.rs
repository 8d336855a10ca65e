use sc2agent_core::ChatMessage;
use std::collections::VecDeque;

/// Rolling dialogue context: a system prompt plus the last `capacity`
/// observation/answer exchanges.
#[derive(Debug, Clone)]
pub struct DialogueWindow {
    system_prompt: String,
    capacity: usize,
    exchanges: VecDeque<(String, String)>,
}

impl DialogueWindow {
    #[must_use]
    pub fn new(system_prompt: impl Into<String>, capacity: usize) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            capacity,
            exchanges: VecDeque::with_capacity(capacity),
        }
    }

    /// Messages for the next request, ending with `observation` as the user turn.
    #[must_use]
    pub fn messages_for(&self, observation: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.exchanges.len() * 2 + 2);
        messages.push(ChatMessage::system(self.system_prompt.as_str()));
        for (user, assistant) in &self.exchanges {
            messages.push(ChatMessage::user(user.as_str()));
            messages.push(ChatMessage::assistant(assistant.as_str()));
        }
        messages.push(ChatMessage::user(observation));
        messages
    }

    pub fn record(&mut self, observation: impl Into<String>, answer: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        if self.exchanges.len() == self.capacity {
            self.exchanges.pop_front();
        }
        let exchange = (observation.into(), answer.into());
        self.exchanges.push_back(exchange);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }
}
