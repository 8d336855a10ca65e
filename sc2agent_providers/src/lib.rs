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

//! Chat clients for the Dify chat-messages endpoint and OpenAI-compatible
//! chat-completions backends.

mod completions;
pub mod dify;
mod error;
pub mod retry;
mod transport;

#[cfg(test)]
mod testing;

pub use completions::CompletionsClient;
pub use dify::{
    ClientConfig, DEFAULT_MAX_RETRIES, DifyMultiTurnClient, DifySingleTurnClient, Example,
};
pub use error::{QueryError, TransportError};
pub use retry::{Backoff, RetryError, retry_with_backoff};
pub use transport::{ChatTransport, HttpReply, HttpTransport};
