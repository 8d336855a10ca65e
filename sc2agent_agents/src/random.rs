use async_trait::async_trait;
use rand::seq::SliceRandom;
use sc2agent_core::{Agent, AgentKind};

/// Actions offered when the configuration does not list any.
pub const DEFAULT_ACTIONS: [&str; 6] = [
    "<TRAIN PROBE>",
    "<BUILD PYLON>",
    "<BUILD GATEWAY>",
    "<BUILD ASSIMILATOR>",
    "<TRAIN ZEALOT>",
    "<EMPTY ACTION>",
];

/// Picks an action uniformly at random, ignoring the observation.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    actions: Vec<String>,
}

impl RandomAgent {
    /// An empty list falls back to [`DEFAULT_ACTIONS`].
    #[must_use]
    pub fn new(actions: Vec<String>) -> Self {
        let actions = if actions.is_empty() {
            DEFAULT_ACTIONS.iter().map(ToString::to_string).collect()
        } else {
            actions
        };
        Self { actions }
    }

    #[must_use]
    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    fn pick(&self) -> String {
        self.actions
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl Agent for RandomAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Random
    }

    async fn act(&mut self, _observation: &str) -> anyhow::Result<String> {
        Ok(self.pick())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn picks_from_configured_actions() {
        let actions = vec!["<A>".to_string(), "<B>".to_string()];
        let mut agent = RandomAgent::new(actions.clone());
        for _ in 0..20 {
            let action = agent.act("ignored").await.unwrap();
            assert!(actions.contains(&action));
        }
    }

    #[test]
    fn empty_list_uses_defaults() {
        let agent = RandomAgent::new(Vec::new());
        assert_eq!(agent.actions().len(), DEFAULT_ACTIONS.len());
        assert_eq!(agent.kind(), AgentKind::Random);
    }
}
