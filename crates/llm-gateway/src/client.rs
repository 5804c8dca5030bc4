//! OpenAI-compatible chat-completion client
//!
//! One attempt per call: no retries, no backoff. The deadline comes from
//! [`GatewayConfig::timeout`].

use async_trait::async_trait;
use reqwest::header;
use tracing::{debug, instrument, warn};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::{ClassifierGateway, Result, SENTINEL_PAYLOAD};

/// Longest provider body excerpt carried into errors and logs
const BODY_SNIPPET_CHARS: usize = 200;

/// Tagged result of a single completion attempt
#[derive(Debug)]
pub enum CompletionOutcome {
    /// Trimmed content of `choices[0].message.content`
    Success(String),
    /// The attempt produced no usable text
    Failure(GatewayError),
}

impl CompletionOutcome {
    /// Collapse to the text handed to the classifier.
    pub fn into_text(self) -> String {
        match self {
            CompletionOutcome::Success(text) => text,
            CompletionOutcome::Failure(_) => SENTINEL_PAYLOAD.to_string(),
        }
    }
}

/// Chat-completion gateway over HTTP
#[derive(Debug, Clone)]
pub struct OpenAiGateway {
    config: GatewayConfig,
    http_client: reqwest::Client,
}

impl OpenAiGateway {
    /// Create a new gateway
    ///
    /// Fails when the API key is empty or cannot be sent as a header.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(GatewayError::Config("API key is required".to_string()));
        }

        let mut auth = header::HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| GatewayError::Config(format!("Invalid API key: {}", e)))?;
        auth.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);

        let http_client = reqwest::Client::builder()
            .user_agent(concat!("mecabot-llm-gateway/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(OpenAiGateway {
            config,
            http_client,
        })
    }

    /// Create gateway from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(GatewayConfig::from_env()?)
    }

    /// Active configuration
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Perform one completion attempt and report how it went.
    pub async fn try_completion(&self, prompt: &str) -> CompletionOutcome {
        match self.request_completion(prompt).await {
            Ok(text) => CompletionOutcome::Success(text),
            Err(err) => CompletionOutcome::Failure(err),
        }
    }

    async fn request_completion(&self, prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest::single_user_message(&self.config, prompt);

        let response = self
            .http_client
            .post(&self.config.api_url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body: snippet(&body),
            });
        }

        if body.trim().is_empty() {
            return Err(GatewayError::EmptyBody);
        }

        let envelope: ChatCompletionResponse = serde_json::from_str(&body)?;
        envelope
            .first_content()
            .map(|content| content.trim().to_string())
            .ok_or(GatewayError::MissingContent)
    }
}

#[async_trait]
impl ClassifierGateway for OpenAiGateway {
    #[instrument(skip_all, fields(model = %self.config.model, prompt_chars = prompt.chars().count()))]
    async fn get_completion(&self, prompt: &str) -> String {
        match self.try_completion(prompt).await {
            CompletionOutcome::Success(text) => {
                debug!(reply_chars = text.chars().count(), "Chat completion succeeded");
                text
            }
            CompletionOutcome::Failure(err) => {
                match &err {
                    GatewayError::Status { status, body } => warn!(
                        status = *status,
                        body = %body,
                        "Chat completion rejected by provider, using sentinel payload"
                    ),
                    other => warn!(
                        error = %other,
                        "Chat completion failed, using sentinel payload"
                    ),
                }
                CompletionOutcome::Failure(err).into_text()
            }
        }
    }
}

/// First `BODY_SNIPPET_CHARS` characters of a provider body.
fn snippet(body: &str) -> String {
    let mut chars = body.chars();
    let head: String = chars.by_ref().take(BODY_SNIPPET_CHARS).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}
