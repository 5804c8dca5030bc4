//! Gateway configuration
//!
//! Endpoint, model and key are supplied from outside. The key has no default.

use std::time::Duration;

use crate::error::GatewayError;
use crate::Result;

/// Chat-completion endpoint used when `OPENAI_API_URL` is unset
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
/// Model identifier used when `OPENAI_MODEL` is unset
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
/// Output cap; the expected reply is a two-field JSON object
pub const DEFAULT_MAX_TOKENS: u32 = 150;
/// Per-request deadline used when `OPENAI_TIMEOUT_SECS` is unset
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Chat-completion gateway configuration
#[derive(Clone)]
pub struct GatewayConfig {
    /// Full chat-completion URL (POST target)
    pub api_url: String,
    /// Model identifier sent in every request
    pub model: String,
    /// Bearer token
    pub api_key: String,
    /// Output token cap
    pub max_tokens: u32,
    /// Sampling temperature; 0.0 keeps classification deterministic
    pub temperature: f32,
    /// Deadline for the whole request, connect included
    pub timeout: Duration,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GatewayConfig {
    /// Create a config for the default endpoint and model
    pub fn new(api_key: impl Into<String>) -> Self {
        GatewayConfig {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: 0.0,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Create from environment variables
    ///
    /// Reads:
    /// - OPENAI_API_KEY (required)
    /// - OPENAI_API_URL (optional, default: OpenAI chat completions)
    /// - OPENAI_MODEL (optional, default: "gpt-3.5-turbo")
    /// - OPENAI_TIMEOUT_SECS (optional, default: 30)
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| GatewayError::Config("OPENAI_API_KEY not set".to_string()))?;

        let mut config = Self::new(api_key);
        if let Ok(url) = std::env::var("OPENAI_API_URL") {
            config.api_url = url;
        }
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            config.model = model;
        }
        if let Ok(secs) = std::env::var("OPENAI_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                GatewayError::Config(format!("OPENAI_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Set the chat-completion URL
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the request deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_classification_defaults() {
        let config = GatewayConfig::new("sk-test");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, 150);
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_builders_override() {
        let config = GatewayConfig::new("sk-test")
            .with_api_url("http://localhost:8080/v1/chat/completions")
            .with_model("gpt-4o-mini")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.api_url, "http://localhost:8080/v1/chat/completions");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = GatewayConfig::new("sk-very-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
