//! Chat-completion wire types

use serde::{Deserialize, Serialize};

use crate::config::GatewayConfig;

/// One chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// POST body for the chat-completion endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub messages: Vec<ChatMessage>,
}

impl ChatCompletionRequest {
    /// A request carrying `prompt` as its only (user) message.
    pub fn single_user_message(config: &GatewayConfig, prompt: &str) -> Self {
        ChatCompletionRequest {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            messages: vec![ChatMessage::user(prompt)],
        }
    }
}

/// Success envelope. Only the path `choices[0].message.content` is read;
/// every level is optional so a partial envelope decodes and is reported
/// as missing content rather than as a decode error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if the provider sent one.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.as_deref())
    }
}
