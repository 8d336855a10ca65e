use anyhow::Context;
use sc2agent_agents::AgentRegistry;
use sc2agent_core::AgentKind;
use std::path::PathBuf;
use tracing::info;

/// Input parameters for the Agent command strategy.
#[derive(Debug, Clone)]
pub struct AgentInput {
    pub config_path: Option<PathBuf>,
    /// Agent to build; defaults to `default_agent` from the config
    pub kind: Option<AgentKind>,
    /// Observation handed to the agent
    pub observation: String,
}

/// Strategy for building an agent from the registry and running one step.
#[derive(Debug, Clone, Copy)]
pub struct AgentStrategy;

impl super::CommandStrategy for AgentStrategy {
    type Input = AgentInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = super::load_config(input.config_path.as_deref())?;
        let kind = input.kind.unwrap_or(config.default_agent);

        let registry = AgentRegistry::builtin();
        let mut agent = registry.build(kind, &config)?;

        info!("Running {kind} agent on observation");
        let action = agent
            .act(&input.observation)
            .await
            .with_context(|| format!("{kind} agent failed to act"))?;
        println!("{action}");

        Ok(())
    }
}
