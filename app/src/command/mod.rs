//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy type with its own input, dispatched
//! statically from `main`.

use sc2agent_config::Config;
use std::path::Path;

mod agent;
mod agents;
mod ask;
mod chat;
mod init;
mod version;

pub use agent::{AgentInput, AgentStrategy};
pub use agents::AgentsStrategy;
pub use ask::{AskInput, AskStrategy};
pub use chat::{ChatInput, ChatStrategy};
pub use init::InitStrategy;
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Load the config from `path`, or from `~/sc2agent/config.json` when unset.
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}
