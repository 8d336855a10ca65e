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

//! Agent strategies and the registry that builds them from configuration.
//!
//! Every [`AgentKind`](sc2agent_core::AgentKind) maps to one factory in
//! [`AgentRegistry::builtin`]. Factories receive the kind's parameter bundle
//! plus the shared prompt and client settings, with secrets already resolved.

mod dify;
mod llm;
mod random;
mod registry;
mod window;

#[cfg(test)]
mod testing;

pub use dify::DifyAgent;
pub use llm::LlmAgent;
pub use random::{DEFAULT_ACTIONS, RandomAgent};
pub use registry::{AgentContext, AgentFactory, AgentRegistry};
pub use window::DialogueWindow;
