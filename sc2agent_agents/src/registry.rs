use anyhow::Context;
use sc2agent_config::{AgentParams, ClientSettings, Config, PromptConfig};
use sc2agent_core::{Agent, AgentKind};
use sc2agent_providers::{
    ClientConfig, CompletionsClient, DifyMultiTurnClient, DifySingleTurnClient, Example,
};
use std::collections::BTreeMap;
use tracing::info;

use crate::dify::DifyAgent;
use crate::llm::LlmAgent;
use crate::random::RandomAgent;
use crate::window::DialogueWindow;

/// Everything a factory needs to build one agent.
pub struct AgentContext<'a> {
    pub kind: AgentKind,
    pub params: &'a AgentParams,
    pub prompt: &'a PromptConfig,
    pub client: &'a ClientSettings,
    /// Resolved secret; `None` for kinds that need no key.
    pub api_key: Option<String>,
}

impl<'a> AgentContext<'a> {
    /// Look up the parameters for `kind` and resolve its secret through `lookup`.
    pub fn resolve<F>(kind: AgentKind, config: &'a Config, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let params = config.params(kind)?;
        let api_key = if kind.needs_api_key() {
            Some(params.resolve_api_key_with(lookup)?)
        } else {
            None
        };
        Ok(Self {
            kind,
            params,
            prompt: &config.prompt,
            client: &config.client,
            api_key,
        })
    }

    fn require_api_key(&self) -> anyhow::Result<String> {
        self.api_key
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Agent '{}' requires an API key", self.kind))
    }

    /// Dify client settings for this context.
    pub fn dify_config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = ClientConfig::new(
            self.params.model_name.as_str(),
            self.require_api_key()?,
            self.params.api_base.as_str(),
            self.params.temperature,
            self.prompt.system_prompt.as_str(),
            Example::new(
                self.prompt.example.user.as_str(),
                self.prompt.example.assistant.as_str(),
            ),
        );
        if let Some(user) = &self.client.user {
            config = config.with_user(user.as_str());
        }
        if let Some(timeout) = self.client.timeout() {
            config = config.with_timeout(timeout);
        }
        Ok(config)
    }

    /// Chat-completions client for the `gpt` and `glm2` kinds.
    pub fn completions_client(&self) -> anyhow::Result<CompletionsClient> {
        let client = CompletionsClient::new(
            self.require_api_key()?,
            self.params.api_base.to_string(),
            self.params.model_name.clone(),
            self.params.temperature,
            self.client.timeout(),
        )?;
        Ok(client)
    }
}

pub type AgentFactory = fn(&AgentContext<'_>) -> anyhow::Result<Box<dyn Agent>>;

/// Maps each agent kind to the constructor that builds it.
pub struct AgentRegistry {
    factories: BTreeMap<AgentKind, AgentFactory>,
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AgentRegistry {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registry with a factory for every [`AgentKind`].
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(AgentKind::Gpt, build_llm);
        registry.register(AgentKind::Glm2, build_llm);
        registry.register(AgentKind::Random, build_random);
        registry.register(AgentKind::Dify, build_dify);
        registry
    }

    pub fn register(&mut self, kind: AgentKind, factory: AgentFactory) {
        self.factories.insert(kind, factory);
    }

    #[must_use]
    pub fn has_factory(&self, kind: AgentKind) -> bool {
        self.factories.contains_key(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = AgentKind> + '_ {
        self.factories.keys().copied()
    }

    /// Build an agent, reading its API key from the process environment.
    pub fn build(&self, kind: AgentKind, config: &Config) -> anyhow::Result<Box<dyn Agent>> {
        self.build_with(kind, config, |name| std::env::var(name).ok())
    }

    pub fn build_with<F>(
        &self,
        kind: AgentKind,
        config: &Config,
        lookup: F,
    ) -> anyhow::Result<Box<dyn Agent>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let factory = self
            .factories
            .get(&kind)
            .ok_or_else(|| anyhow::anyhow!("Agent type not registered: {kind}"))?;
        let ctx = AgentContext::resolve(kind, config, lookup)
            .with_context(|| format!("Failed to configure {kind} agent"))?;

        info!("Building {kind} agent (model: {})", ctx.params.model_name);
        factory(&ctx)
            .with_context(|| format!("Failed to build {kind} agent"))
    }
}

fn build_llm(ctx: &AgentContext<'_>) -> anyhow::Result<Box<dyn Agent>> {
    let client = ctx.completions_client()?;
    let window = DialogueWindow::new(ctx.prompt.system_prompt.as_str(), ctx.params.last_k);
    Ok(Box::new(LlmAgent::new(
        ctx.kind,
        client,
        window,
        ctx.params.request_delay(),
    )))
}

fn build_random(ctx: &AgentContext<'_>) -> anyhow::Result<Box<dyn Agent>> {
    Ok(Box::new(RandomAgent::new(ctx.params.actions.clone())))
}

fn build_dify(ctx: &AgentContext<'_>) -> anyhow::Result<Box<dyn Agent>> {
    let config = ctx.dify_config()?;
    let delay = ctx.params.request_delay();
    let agent = if ctx.client.multi_turn {
        DifyAgent::multi_turn(DifyMultiTurnClient::new(config)?, delay)
    } else {
        let client = DifySingleTurnClient::new(config)?;
        DifyAgent::single_turn(client.with_max_retries(ctx.client.max_retries), delay)
    };
    Ok(Box::new(agent))
}
