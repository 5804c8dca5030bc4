//! HTTP-level tests for `OpenAiGateway` against a wiremock provider.

use std::time::Duration;

use llm_gateway::{
    ClassifierGateway, CompletionOutcome, GatewayConfig, GatewayError, OpenAiGateway,
    SENTINEL_PAYLOAD,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

fn gateway_for(server: &MockServer) -> OpenAiGateway {
    let config = GatewayConfig::new("sk-test-key")
        .with_api_url(format!("{}{}", server.uri(), COMPLETIONS_PATH))
        .with_model("gpt-test")
        .with_timeout(Duration::from_secs(5));
    OpenAiGateway::new(config).unwrap()
}

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn sends_single_deterministic_user_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(header("authorization", "Bearer sk-test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-test",
            "temperature": 0.0,
            "max_tokens": 150,
            "messages": [{ "role": "user", "content": "Devuelve SOLO JSON" }]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body(r#"{"category":"cambio_aceite","minutes":30}"#)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let text = gateway_for(&server)
        .get_completion("Devuelve SOLO JSON")
        .await;

    assert_eq!(text, r#"{"category":"cambio_aceite","minutes":30}"#);
}

#[tokio::test]
async fn trims_model_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion_body(
                "\n  {\"category\":null, \"minutes\":null}  \n",
            )),
        )
        .mount(&server)
        .await;

    let text = gateway_for(&server).get_completion("prompt").await;
    assert_eq!(text, r#"{"category":null, "minutes":null}"#);
}

#[tokio::test]
async fn non_success_status_returns_sentinel() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);

    match gateway.try_completion("prompt").await {
        CompletionOutcome::Failure(GatewayError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn unauthorized_returns_sentinel_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Incorrect API key provided" }
        })))
        .mount(&server)
        .await;

    let text = gateway_for(&server).get_completion("prompt").await;
    assert_eq!(text, SENTINEL_PAYLOAD);
}

#[tokio::test]
async fn empty_body_returns_sentinel() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    assert!(matches!(
        gateway.try_completion("prompt").await,
        CompletionOutcome::Failure(GatewayError::EmptyBody)
    ));
    assert_eq!(gateway.get_completion("prompt").await, SENTINEL_PAYLOAD);
}

#[tokio::test]
async fn missing_content_returns_sentinel() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    assert!(matches!(
        gateway.try_completion("prompt").await,
        CompletionOutcome::Failure(GatewayError::MissingContent)
    ));
    assert_eq!(gateway.get_completion("prompt").await, SENTINEL_PAYLOAD);
}

#[tokio::test]
async fn non_json_envelope_returns_sentinel() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    assert!(matches!(
        gateway.try_completion("prompt").await,
        CompletionOutcome::Failure(GatewayError::Decode(_))
    ));
    assert_eq!(gateway.get_completion("prompt").await, SENTINEL_PAYLOAD);
}

#[tokio::test]
async fn unreachable_endpoint_returns_sentinel() {
    let server = MockServer::start().await;
    let gateway = gateway_for(&server);
    // Shut the provider down so the connection is refused.
    drop(server);

    assert!(matches!(
        gateway.try_completion("prompt").await,
        CompletionOutcome::Failure(GatewayError::Transport(_))
    ));
    assert_eq!(gateway.get_completion("prompt").await, SENTINEL_PAYLOAD);
}

#[tokio::test]
async fn slow_provider_hits_deadline() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("{}"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = GatewayConfig::new("sk-test-key")
        .with_api_url(format!("{}{}", server.uri(), COMPLETIONS_PATH))
        .with_timeout(Duration::from_millis(200));
    let gateway = OpenAiGateway::new(config).unwrap();

    assert_eq!(gateway.get_completion("prompt").await, SENTINEL_PAYLOAD);
}

#[tokio::test]
async fn each_call_is_a_single_attempt() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    gateway.get_completion("first").await;
    gateway.get_completion("second").await;
    // `expect(2)` is verified when the server drops: no retries happened.
}
