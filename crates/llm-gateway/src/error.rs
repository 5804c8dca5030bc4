//! Error types for llm-gateway

use thiserror::Error;

/// Why a chat-completion attempt produced no usable text
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Gateway could not be configured (missing key, bad header, client build)
    #[error("Gateway configuration error: {0}")]
    Config(String),

    /// Network failure, timeout, or connection refused
    #[error("HTTP transport error: {0}")]
    Transport(String),

    /// Provider answered with a non-success status
    #[error("Provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Provider answered 2xx with nothing in the body
    #[error("Provider returned an empty body")]
    EmptyBody,

    /// Envelope parsed but `choices[0].message.content` is absent
    #[error("Provider response missing choices[0].message.content")]
    MissingContent,

    /// Body was not a chat-completion envelope
    #[error("Provider response could not be decoded: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_carries_code_and_body() {
        let err = GatewayError::Status {
            status: 429,
            body: "rate limited".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("429"));
        assert!(msg.contains("rate limited"));
    }

    #[test]
    fn test_decode_from_serde() {
        let err: GatewayError = serde_json::from_str::<serde_json::Value>("not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, GatewayError::Decode(_)));
    }
}
