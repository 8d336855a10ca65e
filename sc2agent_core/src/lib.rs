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

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Answer returned to callers whenever the chat endpoint cannot produce one.
pub const FALLBACK_ANSWER: &str =
    "I'm sorry, but I am unable to provide a response at this time due to technical difficulties.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The closed set of agent strategies the registry knows how to build.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Gpt,
    Random,
    Glm2,
    Dify,
}

impl AgentKind {
    pub const ALL: [Self; 4] = [Self::Gpt, Self::Random, Self::Glm2, Self::Dify];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gpt => "gpt",
            Self::Random => "random",
            Self::Glm2 => "glm2",
            Self::Dify => "dify",
        }
    }

    /// Whether agents of this kind talk to a remote model.
    #[must_use]
    pub const fn needs_api_key(self) -> bool {
        !matches!(self, Self::Random)
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown agent type: {0} (expected one of: gpt, random, glm2, dify)")]
pub struct UnknownAgentKind(pub String);

impl FromStr for AgentKind {
    type Err = UnknownAgentKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == key)
            .ok_or_else(|| UnknownAgentKind(s.to_string()))
    }
}

/// A policy that turns a textual game observation into an action.
#[async_trait]
pub trait Agent: Send {
    fn kind(&self) -> AgentKind;

    async fn act(&mut self, observation: &str) -> anyhow::Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_kind_parses_case_insensitively() {
        assert_eq!("DIFY".parse::<AgentKind>(), Ok(AgentKind::Dify));
        assert_eq!(" glm2 ".parse::<AgentKind>(), Ok(AgentKind::Glm2));
        assert!("claude".parse::<AgentKind>().is_err());
    }

    #[test]
    fn agent_kind_serializes_as_registry_key() {
        let json = serde_json::to_string(&AgentKind::Gpt).unwrap();
        assert_eq!(json, "\"gpt\"");
        let kind: AgentKind = serde_json::from_str("\"random\"").unwrap();
        assert_eq!(kind, AgentKind::Random);
    }

    #[test]
    fn only_random_runs_offline() {
        let offline: Vec<_> = AgentKind::ALL
            .into_iter()
            .filter(|k| !k.needs_api_key())
            .collect();
        assert_eq!(offline, vec![AgentKind::Random]);
    }

    #[test]
    fn chat_message_serializes_lowercase_role() {
        let msg = ChatMessage::system("be brief");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["role"], "system");
        assert_eq!(value["content"], "be brief");
    }
}
