//! Multi-turn conversation command.
//!
//! Unlike `ask`, the Dify conversation id is carried from one turn to the
//! next so the app keeps dialogue context.

use sc2agent_agents::AgentContext;
use sc2agent_core::AgentKind;
use sc2agent_providers::{DifyMultiTurnClient, HttpTransport};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

/// Input parameters for the Chat command strategy.
#[derive(Debug, Clone)]
pub struct ChatInput {
    pub config_path: Option<PathBuf>,
    /// Optional single message to send (non-interactive mode)
    pub message: Option<String>,
}

/// Strategy for executing the Chat command.
#[derive(Debug, Clone, Copy)]
pub struct ChatStrategy;

impl super::CommandStrategy for ChatStrategy {
    type Input = ChatInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = super::load_config(input.config_path.as_deref())?;
        let ctx = AgentContext::resolve(AgentKind::Dify, &config, super::env_lookup)?;
        let mut client = DifyMultiTurnClient::new(ctx.dify_config()?)?;

        if let Some(msg) = input.message {
            let answer = client.query(&msg).await?;
            println!("{answer}");
            debug!("Conversation id: {:?}", client.conversation_id());
        } else {
            run_interactive(&mut client).await?;
        }

        Ok(())
    }
}

async fn run_interactive(client: &mut DifyMultiTurnClient<HttpTransport>) -> anyhow::Result<()> {
    println!("=== Dify conversation ===");
    println!("Type 'exit', 'quit', or Ctrl+C to end, 'reset' to start over.\n");

    let mut turns = 0usize;
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if matches!(input, "exit" | "quit" | "q") {
            break;
        }
        if input == "reset" {
            client.reset();
            println!("\nStarted a new conversation.\n");
            continue;
        }
        if input.is_empty() {
            continue;
        }

        match client.query(input).await {
            Ok(answer) => {
                turns += 1;
                println!("\n{answer}\n");
            }
            Err(e) => {
                eprintln!("Error: {e}");
            }
        }
    }

    info!("Conversation ended after {turns} turns");
    println!("\nSession ended. Total turns: {turns}");
    Ok(())
}
