#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

mod command;

use clap::{Parser, Subcommand};
use command::{
    AgentInput, AgentStrategy, AgentsStrategy, AskInput, AskStrategy, ChatInput, ChatStrategy,
    CommandStrategy, InitStrategy, VersionStrategy,
};
use sc2agent_core::AgentKind;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "sc2agent")]
#[command(about = "Dify chat clients and agent registry for TextStarCraft2", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/sc2agent/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one stateless query to the Dify app
    Ask {
        /// Query to send
        #[arg(short = 'm', long)]
        message: String,

        /// Maximum number of attempts
        #[arg(short = 'r', long)]
        retries: Option<usize>,
    },
    /// Hold a multi-turn conversation with the Dify app
    Chat {
        /// Single message to send
        #[arg(short = 'm', long)]
        message: Option<String>,
    },
    /// Build an agent from the registry and act on one observation
    Agent {
        /// Agent type: gpt, random, glm2 or dify
        #[arg(short = 'k', long)]
        kind: Option<AgentKind>,

        /// Observation text
        #[arg(short = 'o', long)]
        observation: String,
    },
    /// List registered agents and their parameters
    Agents,
    /// Initialize configuration
    Init,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config_path = cli.config;

    match cli.command {
        Commands::Ask { message, retries } => {
            AskStrategy
                .execute(AskInput {
                    config_path,
                    message,
                    retries,
                })
                .await
        }
        Commands::Chat { message } => {
            ChatStrategy
                .execute(ChatInput {
                    config_path,
                    message,
                })
                .await
        }
        Commands::Agent { kind, observation } => {
            AgentStrategy
                .execute(AgentInput {
                    config_path,
                    kind,
                    observation,
                })
                .await
        }
        Commands::Agents => AgentsStrategy.execute(config_path).await,
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Version => VersionStrategy.execute(()).await,
    }
}
