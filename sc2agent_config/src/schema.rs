use anyhow::Context;
use sc2agent_core::AgentKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

const CONFIG_DIR: &str = "sc2agent";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "Config::default_agent")]
    pub default_agent: AgentKind,
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub client: ClientSettings,
    pub agents: BTreeMap<AgentKind, AgentParams>,
}

/// Prompt inputs forwarded to the Dify app on every request.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct PromptConfig {
    #[serde(default = "PromptConfig::default_system_prompt")]
    pub system_prompt: String,
    #[serde(default)]
    pub example: PromptExample,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            system_prompt: Self::default_system_prompt(),
            example: PromptExample::default(),
        }
    }
}

impl PromptConfig {
    fn default_system_prompt() -> String {
        "You are a helpful assistant".to_string()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct PromptExample {
    pub user: String,
    pub assistant: String,
}

impl Default for PromptExample {
    fn default() -> Self {
        Self {
            user: "Hello, who are you?".to_string(),
            assistant: "I am a helpful assistant".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Caller identifier sent with Dify requests; each client picks a default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default = "ClientSettings::default_max_retries")]
    pub max_retries: usize,
    /// Keep one Dify conversation alive across agent steps.
    #[serde(default)]
    pub multi_turn: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            user: None,
            timeout_secs: None,
            max_retries: Self::default_max_retries(),
            multi_turn: false,
        }
    }
}

impl ClientSettings {
    const fn default_max_retries() -> usize {
        5
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Per-agent parameter bundle.
///
/// The API key itself never lives in the file; `api_key_env` names the
/// environment variable holding it.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AgentParams {
    pub model_name: String,
    pub project: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    pub api_base: Url,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "AgentParams::default_action_interval")]
    pub action_interval: u32,
    /// Seconds to wait before each model request.
    #[serde(default = "AgentParams::default_request_delay")]
    pub request_delay: f64,
    #[serde(default = "AgentParams::default_chunk_window")]
    pub chunk_window: usize,
    #[serde(default = "AgentParams::default_action_window")]
    pub action_window: usize,
    #[serde(default = "AgentParams::default_action_mix_rate")]
    pub action_mix_rate: f64,
    /// Number of past exchanges kept in the dialogue window.
    #[serde(default = "AgentParams::default_last_k")]
    pub last_k: usize,
    /// Action vocabulary for agents that pick without a model.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<String>,
}

impl AgentParams {
    const fn default_action_interval() -> u32 {
        10
    }

    const fn default_request_delay() -> f64 {
        0.2
    }

    const fn default_chunk_window() -> usize {
        5
    }

    const fn default_action_window() -> usize {
        10
    }

    const fn default_action_mix_rate() -> f64 {
        0.5
    }

    const fn default_last_k() -> usize {
        5
    }

    #[must_use]
    pub fn request_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.request_delay).unwrap_or(Duration::ZERO)
    }

    /// Resolve the API key from the process environment.
    pub fn resolve_api_key(&self) -> anyhow::Result<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    pub fn resolve_api_key_with<F>(&self, lookup: F) -> anyhow::Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let name = self
            .api_key_env
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("No api_key_env configured for {}", self.project))?;

        lookup(name)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("Environment variable {name} is not set"))
    }
}

impl Config {
    const fn default_agent() -> AgentKind {
        AgentKind::Dify
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !self.agents.contains_key(&self.default_agent) {
            anyhow::bail!(
                "default_agent '{}' has no entry under \"agents\"",
                self.default_agent
            );
        }
        for (kind, params) in &self.agents {
            if kind.needs_api_key() && params.api_key_env.is_none() {
                warn!("Agent '{kind}' has no api_key_env; building it will fail");
            }
        }
        Ok(())
    }

    /// Parameters for `kind`, or an error naming the missing entry.
    pub fn params(&self, kind: AgentKind) -> anyhow::Result<&AgentParams> {
        self.agents
            .get(&kind)
            .ok_or_else(|| anyhow::anyhow!("No parameters configured for agent '{kind}'"))
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join(CONFIG_DIR);
        Ok(config_dir.join(CONFIG_FILE))
    }

    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'sc2agent init' to create config.",
                config_path.display()
            );
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_json(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join(CONFIG_DIR);

        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        std::fs::write(&config_path, CONFIG_TEMPLATE)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Export the API keys named by each agent's api_key_env");
        println!("      (DIFY_API_KEY, OPENAI_API_KEY, GLM2_API_KEY)");
        println!("   2. Run 'sc2agent ask -m \"What is your name?\"' to test the Dify app");
        println!();
        println!("🔧 Configuration options:");
        println!("   - default_agent: gpt, random, glm2 or dify");
        println!("   - client.max_retries: attempts per single-turn query");
        println!("   - client.multi_turn: keep one Dify conversation across agent steps");
        println!();
        Ok(())
    }
}

pub const CONFIG_TEMPLATE: &str = r#"{
  "default_agent": "dify",
  "prompt": {
    "system_prompt": "You are a helpful assistant",
    "example": {
      "user": "Hello, who are you?",
      "assistant": "I am a helpful assistant"
    }
  },
  "client": {
    "user": "sc2_test",
    "max_retries": 5,
    "multi_turn": false
  },
  "agents": {
    "gpt": {
      "model_name": "gpt-3.5-turbo-16k",
      "project": "TextStarCraft2",
      "api_key_env": "OPENAI_API_KEY",
      "api_base": "https://api.openai.com/v1",
      "temperature": 0,
      "action_interval": 10,
      "request_delay": 0.2,
      "chunk_window": 5,
      "action_window": 10,
      "action_mix_rate": 0.5,
      "last_k": 5
    },
    "glm2": {
      "model_name": "llama2",
      "project": "glm2_TextStarCraft2",
      "api_key_env": "GLM2_API_KEY",
      "api_base": "http://localhost:8000/v1",
      "temperature": 0,
      "action_interval": 10,
      "request_delay": 0.2,
      "chunk_window": 5,
      "action_window": 10,
      "action_mix_rate": 0.5,
      "last_k": 5
    },
    "random": {
      "model_name": "gpt-3.5-turbo",
      "project": "TextStarCraft2",
      "api_base": "https://api.openai.com/v1",
      "temperature": 0,
      "action_interval": 10,
      "request_delay": 0.2,
      "chunk_window": 5,
      "action_window": 10,
      "action_mix_rate": 0.5,
      "last_k": 5
    },
    "dify": {
      "model_name": "gpt-4o-mini",
      "project": "TextStarCraft2",
      "api_key_env": "DIFY_API_KEY",
      "api_base": "https://api.dify.ai/v1",
      "temperature": 0,
      "action_interval": 10,
      "request_delay": 0.2,
      "chunk_window": 5,
      "action_window": 10,
      "action_mix_rate": 0.5,
      "last_k": 5
    }
  }
}"#;
