//! LLM-Gateway: Chat-Completion Client for MecaBot
//!
//! Sends one classification prompt to an OpenAI-compatible chat-completion
//! endpoint and hands back the model's raw text.
//!
//! ## Layer 1 - External Services
//!
//! Focus: a total call. Transport errors, non-2xx statuses, empty bodies and
//! envelopes without `choices[0].message.content` never reach the caller as
//! errors. They are logged and replaced by [`SENTINEL_PAYLOAD`], the same
//! text a model returns when it cannot classify.

mod client;
mod config;
mod error;
pub mod fakes;
mod types;

pub use client::{CompletionOutcome, OpenAiGateway};
pub use config::{
    GatewayConfig, DEFAULT_API_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS,
};
pub use error::GatewayError;
pub use types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Choice, ResponseMessage,
};

use async_trait::async_trait;

/// Text returned in place of a model answer when the call fails.
pub const SENTINEL_PAYLOAD: &str = r#"{"category":null, "minutes":null}"#;

/// Result type for gateway operations that can fail
pub type Result<T> = std::result::Result<T, GatewayError>;

/// A language-model endpoint that answers a single prompt with text.
///
/// Implementations must be total: any failure is reported by returning
/// [`SENTINEL_PAYLOAD`], never by panicking or erroring.
#[async_trait]
pub trait ClassifierGateway: Send + Sync {
    /// Send `prompt` as a single user message and return the reply text.
    async fn get_completion(&self, prompt: &str) -> String;
}
