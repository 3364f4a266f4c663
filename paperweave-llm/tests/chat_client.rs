use httpmock::prelude::*;
use serde_json::json;

use paperweave_core::{ChatLlm, ChatRequest, Message, PaperweaveError};
use paperweave_llm::OpenAiChatClient;

fn request() -> ChatRequest {
    ChatRequest {
        model: "gpt-4o-mini".to_string(),
        messages: vec![Message::user("Summarize this.")],
        max_tokens: 64,
        temperature: 0.0,
    }
}

#[tokio::test]
async fn sends_chat_completion_and_returns_first_choice() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("authorization", "Bearer test-key")
            .json_body_partial(
                json!({
                    "model": "gpt-4o-mini",
                    "max_tokens": 64,
                    "messages": [{"role": "user", "content": "Summarize this."}]
                })
                .to_string(),
            );
        then.status(200).json_body(json!({
            "choices": [{"message": {"role": "assistant", "content": "A summary."}}]
        }));
    });

    let client = OpenAiChatClient::new("test-key")
        .unwrap()
        .with_base_url(format!("{}/v1", server.base_url()));
    let response = client.complete(request()).await.unwrap();

    mock.assert();
    assert_eq!(response.content, "A summary.");
}

#[tokio::test]
async fn http_error_maps_to_provider_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(500).body("upstream exploded");
    });

    let client = OpenAiChatClient::new("test-key")
        .unwrap()
        .with_base_url(format!("{}/v1", server.base_url()));
    let result = client.complete(request()).await;

    assert!(matches!(result, Err(PaperweaveError::LlmProvider(_))));
}

#[tokio::test]
async fn empty_choices_is_a_provider_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(json!({"choices": []}));
    });

    let client = OpenAiChatClient::new("test-key")
        .unwrap()
        .with_base_url(format!("{}/v1", server.base_url()));
    let result = client.complete(request()).await;

    assert!(matches!(result, Err(PaperweaveError::LlmProvider(_))));
}
