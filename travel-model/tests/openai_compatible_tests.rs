use futures::StreamExt;
use travel_core::{Content, FinishReason, Llm, LlmRequest, Part};
use travel_model::{OpenAICompatible, OpenAICompatibleConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> OpenAICompatible {
    OpenAICompatible::new(
        OpenAICompatibleConfig::new("test-key", "gemini-2.0-flash")
            .with_provider_name("gemini")
            .with_base_url(server.uri()),
    )
    .unwrap()
}

fn sse_body(events: &[&str]) -> String {
    let mut body = String::new();
    for event in events {
        body.push_str("data: ");
        body.push_str(event);
        body.push_str("\n\n");
    }
    body.push_str("data: [DONE]\n\n");
    body
}

#[tokio::test]
async fn test_streaming_text_deltas() {
    let server = MockServer::start().await;

    let body = sse_body(&[
        r#"{"id":"chatcmpl-1","object":"chat.completion.chunk","created":1700000000,"model":"gemini-2.0-flash","choices":[{"index":0,"delta":{"role":"assistant","content":"Lisbon "},"finish_reason":null}]}"#,
        r#"{"id":"chatcmpl-1","object":"chat.completion.chunk","created":1700000000,"model":"gemini-2.0-flash","choices":[{"index":0,"delta":{"content":"in May"},"finish_reason":null}]}"#,
        r#"{"id":"chatcmpl-1","object":"chat.completion.chunk","created":1700000000,"model":"gemini-2.0-flash","choices":[{"index":0,"delta":{},"finish_reason":"stop"}]}"#,
    ]);

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = LlmRequest::new(
        "gemini-2.0-flash",
        vec![Content::new("user").with_text("How is Lisbon in May?")],
    );

    let stream = client.generate_content(request, true).await.unwrap();
    let responses: Vec<_> = stream.map(|r| r.unwrap()).collect().await;

    // Two content-bearing partials plus the final empty turn marker.
    assert_eq!(responses.len(), 3);
    assert!(responses[0].partial);
    assert_eq!(responses[0].content.as_ref().unwrap().text(), "Lisbon ");
    assert!(responses[1].partial);
    assert_eq!(responses[1].content.as_ref().unwrap().text(), "in May");
    assert!(responses[2].turn_complete);
    assert_eq!(responses[2].finish_reason, Some(FinishReason::Stop));

    let full: String = responses
        .iter()
        .filter_map(|r| r.content.as_ref())
        .flat_map(|c| c.parts.iter())
        .filter_map(Part::text)
        .collect();
    assert_eq!(full, "Lisbon in May");
}

#[tokio::test]
async fn test_streaming_accumulates_tool_call_arguments() {
    let server = MockServer::start().await;

    // Arguments split across chunks; name and id arrive in the first one.
    let body = sse_body(&[
        r#"{"id":"chatcmpl-2","object":"chat.completion.chunk","created":1700000000,"model":"gemini-2.0-flash","choices":[{"index":0,"delta":{"role":"assistant","tool_calls":[{"index":0,"id":"call_w1","type":"function","function":{"name":"fetch_weather","arguments":"{\"loc"}}]},"finish_reason":null}]}"#,
        r#"{"id":"chatcmpl-2","object":"chat.completion.chunk","created":1700000000,"model":"gemini-2.0-flash","choices":[{"index":0,"delta":{"tool_calls":[{"index":0,"function":{"arguments":"ation\":\"Lisbon\"}"}}]},"finish_reason":null}]}"#,
        r#"{"id":"chatcmpl-2","object":"chat.completion.chunk","created":1700000000,"model":"gemini-2.0-flash","choices":[{"index":0,"delta":{},"finish_reason":"tool_calls"}]}"#,
    ]);

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = LlmRequest::new(
        "gemini-2.0-flash",
        vec![Content::new("user").with_text("What's the weather in Lisbon?")],
    );

    let stream = client.generate_content(request, true).await.unwrap();
    let responses: Vec<_> = stream.map(|r| r.unwrap()).collect().await;

    // Nothing is emitted until the arguments are complete.
    assert_eq!(responses.len(), 1);
    let response = &responses[0];
    assert!(response.turn_complete);

    let content = response.content.as_ref().unwrap();
    assert_eq!(content.parts.len(), 1);
    match &content.parts[0] {
        Part::FunctionCall { name, args, id } => {
            assert_eq!(name, "fetch_weather");
            assert_eq!(args["location"], "Lisbon");
            assert_eq!(id.as_deref(), Some("call_w1"));
        }
        other => panic!("expected function call, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_streaming_maps_first_choice() {
    let server = MockServer::start().await;

    let body = r#"{
        "id": "chatcmpl-3",
        "object": "chat.completion",
        "created": 1700000000,
        "model": "gemini-2.0-flash",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": "Try the Alfama district."},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 12, "completion_tokens": 6, "total_tokens": 18}
    }"#;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = LlmRequest::new(
        "gemini-2.0-flash",
        vec![Content::new("user").with_text("Where should I stay in Lisbon?")],
    );

    let mut stream = client.generate_content(request, false).await.unwrap();
    let response = stream.next().await.unwrap().unwrap();
    assert!(stream.next().await.is_none());

    assert_eq!(response.content.unwrap().text(), "Try the Alfama district.");
    assert!(response.turn_complete);
    assert_eq!(response.finish_reason, Some(FinishReason::Stop));

    let usage = response.usage_metadata.unwrap();
    assert_eq!(usage.prompt_token_count, 12);
    assert_eq!(usage.candidates_token_count, 6);
    assert_eq!(usage.total_token_count, 18);
}

#[tokio::test]
async fn test_api_error_surfaces_provider_name() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_raw(
            r#"{"error": {"message": "internal", "type": "server_error"}}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request =
        LlmRequest::new("gemini-2.0-flash", vec![Content::new("user").with_text("hi")]);

    let result = client.generate_content(request, false).await;
    let err = result.err().expect("500 must surface as an error");
    assert!(err.to_string().contains("gemini"));
}
