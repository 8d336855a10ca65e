use sc2agent_agents::AgentRegistry;
use std::path::PathBuf;

/// Strategy for listing registered agents and their parameters.
///
/// API keys are never printed; only whether the referenced variable is set.
#[derive(Debug, Clone, Copy)]
pub struct AgentsStrategy;

impl super::CommandStrategy for AgentsStrategy {
    type Input = Option<PathBuf>;

    async fn execute(&self, config_path: Self::Input) -> anyhow::Result<()> {
        let config = super::load_config(config_path.as_deref())?;
        let registry = AgentRegistry::builtin();

        println!("=== sc2agent Agents ===\n");

        for kind in registry.kinds() {
            let marker = if kind == config.default_agent {
                " (default)"
            } else {
                ""
            };
            println!("{kind}{marker}:");

            let Ok(params) = config.params(kind) else {
                println!("  (not configured)\n");
                continue;
            };

            println!("  Model: {}", params.model_name);
            println!("  Project: {}", params.project);
            println!("  API Base: {}", params.api_base);
            match params.api_key_env.as_deref() {
                Some(name) => {
                    let status = if super::env_lookup(name).is_some() {
                        "set"
                    } else {
                        "not set"
                    };
                    println!("  API Key: ${name} ({status})");
                }
                None => println!("  API Key: (none)"),
            }
            println!("  Temperature: {}", params.temperature);
            println!("  Action Interval: {}", params.action_interval);
            println!("  Request Delay: {}s", params.request_delay);
            println!(
                "  Windows: chunk={} action={} mix_rate={} last_k={}",
                params.chunk_window, params.action_window, params.action_mix_rate, params.last_k
            );
            println!();
        }

        println!("Client:");
        let user = config.client.user.as_deref().unwrap_or("(client default)");
        println!("  User: {user}");
        match config.client.timeout_secs {
            Some(secs) => println!("  Timeout: {secs}s"),
            None => println!("  Timeout: (transport default)"),
        }
        println!("  Max Retries: {}", config.client.max_retries);
        println!("  Multi-turn: {}", config.client.multi_turn);

        Ok(())
    }
}
