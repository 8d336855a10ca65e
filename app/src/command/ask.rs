use sc2agent_agents::AgentContext;
use sc2agent_core::AgentKind;
use sc2agent_providers::DifySingleTurnClient;
use std::path::PathBuf;
use tracing::info;

/// Input parameters for the Ask command strategy.
#[derive(Debug, Clone)]
pub struct AskInput {
    pub config_path: Option<PathBuf>,
    /// Query to send
    pub message: String,
    /// Attempt budget; defaults to `client.max_retries` from the config
    pub retries: Option<usize>,
}

/// Strategy for a single stateless query against the Dify app.
///
/// Failures never surface as errors here: the client falls back to its
/// fixed apology once retries are spent.
#[derive(Debug, Clone, Copy)]
pub struct AskStrategy;

impl super::CommandStrategy for AskStrategy {
    type Input = AskInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = super::load_config(input.config_path.as_deref())?;
        let ctx = AgentContext::resolve(AgentKind::Dify, &config, super::env_lookup)?;

        let client = DifySingleTurnClient::new(ctx.dify_config()?)?;
        let retries = input.retries.unwrap_or(config.client.max_retries);

        info!("Asking Dify with up to {retries} attempts");
        let answer = client.query_with_retries(&input.message, retries).await;
        println!("{answer}");

        Ok(())
    }
}
