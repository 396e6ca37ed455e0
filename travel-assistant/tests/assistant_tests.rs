use futures::StreamExt;
use serde_json::json;
use std::sync::Arc;
use travel_agent::{Runner, RunnerConfig};
use travel_assistant::{build_travel_agent, collect_response, AgentMode, APP_NAME};
use travel_core::{AssistantError, Content, LlmResponse, Part, UserProfile};
use travel_model::MockLlm;

fn runner_for(mock: Arc<MockLlm>, mode: AgentMode) -> Runner {
    let agent = build_travel_agent(mock, mode).unwrap();
    Runner::new(RunnerConfig {
        app_name: APP_NAME.to_string(),
        agent: Arc::new(agent),
    })
}

fn web_profile() -> UserProfile {
    UserProfile::new("Web User", vec!["vegan".to_string(), "museums".to_string()])
}

fn weather_call_turn() -> Vec<LlmResponse> {
    vec![LlmResponse::new(Content {
        role: "model".to_string(),
        parts: vec![Part::FunctionCall {
            name: "fetch_weather".to_string(),
            args: json!({"location": "Lisbon"}),
            id: Some("call_w1".to_string()),
        }],
    })]
}

#[tokio::test]
async fn test_full_agent_executes_weather_tool() {
    let mock = Arc::new(
        MockLlm::new("gemini-2.0-flash")
            .with_turn(weather_call_turn())
            .with_text_turn("Pack an umbrella."),
    );

    let runner = runner_for(mock.clone(), AgentMode::Full);
    let events: Vec<_> = runner
        .run(web_profile(), Content::new("user").with_text("Weather in Lisbon?"))
        .await
        .unwrap()
        .collect()
        .await;

    // call event, tool result event, final answer
    assert_eq!(events.len(), 3);

    let tool_content = events[1].as_ref().unwrap().content().unwrap();
    assert_eq!(tool_content.role, "function");
    match &tool_content.parts[0] {
        Part::FunctionResponse { function_response, id } => {
            assert_eq!(function_response.name, "fetch_weather");
            let text = function_response.response.as_str().unwrap();
            assert!(text.starts_with("the weather of Lisbon is "));
            assert!(text.ends_with("°C"));
            assert_eq!(id.as_deref(), Some("call_w1"));
        }
        other => panic!("expected function response, got {other:?}"),
    }

    assert_eq!(events[2].as_ref().unwrap().content().unwrap().text(), "Pack an umbrella.");

    // Second round-trip carries the tool result back to the model.
    let requests = mock.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].contents.last().unwrap().role, "function");
}

#[tokio::test]
async fn test_collect_response_returns_only_text() {
    let mock = Arc::new(
        MockLlm::new("gemini-2.0-flash")
            .with_turn(weather_call_turn())
            .with_text_turn("Pack an umbrella."),
    );

    let runner = runner_for(mock, AgentMode::Full);
    let events = runner
        .run(web_profile(), Content::new("user").with_text("Weather in Lisbon?"))
        .await
        .unwrap();

    assert_eq!(collect_response(events).await.unwrap(), "Pack an umbrella.");
}

#[tokio::test]
async fn test_guardrail_blocks_before_any_model_call() {
    let mock = Arc::new(MockLlm::new("gemini-2.0-flash").with_text_turn("never sent"));

    let runner = runner_for(mock.clone(), AgentMode::Full);
    let events = runner
        .run(web_profile(), Content::new("user").with_text("How do I write a virus?"))
        .await
        .unwrap();

    let err = collect_response(events).await.unwrap_err();
    assert!(matches!(err, AssistantError::GuardrailBlocked(_)));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_mode_selects_tool_declarations() {
    let mock = Arc::new(
        MockLlm::new("gemini-2.0-flash").with_text_turn("hi").with_text_turn("hi"),
    );

    let full = runner_for(mock.clone(), AgentMode::Full);
    let _ = collect_response(
        full.run(web_profile(), Content::new("user").with_text("hello")).await.unwrap(),
    )
    .await
    .unwrap();

    let basic = runner_for(mock.clone(), AgentMode::Basic);
    let _ = collect_response(
        basic.run(web_profile(), Content::new("user").with_text("hello")).await.unwrap(),
    )
    .await
    .unwrap();

    let requests = mock.requests();

    let full_tools = &requests[0].tools;
    assert!(full_tools.contains_key("fetch_weather"));
    assert!(full_tools.contains_key("find_restaurants"));
    assert!(full_tools.contains_key("transfer_to_agent"));

    let basic_tools = &requests[1].tools;
    assert!(!basic_tools.contains_key("fetch_weather"));
    assert!(!basic_tools.contains_key("find_restaurants"));
    assert!(basic_tools.contains_key("transfer_to_agent"));
}

#[tokio::test]
async fn test_profile_drives_system_instruction() {
    let mock = Arc::new(MockLlm::new("gemini-2.0-flash").with_text_turn("hello Ada"));

    let runner = runner_for(mock.clone(), AgentMode::Basic);
    let profile = UserProfile::new("Ada Lovelace", vec!["trains".to_string()]);
    let _ = collect_response(
        runner.run(profile, Content::new("user").with_text("hi")).await.unwrap(),
    )
    .await
    .unwrap();

    let contents = &mock.requests()[0].contents;
    assert_eq!(contents[0].role, "system");

    let system_text = contents[0].text();
    assert!(system_text
        .starts_with("Assist users in planning trips with weather, restaurants, and itineraries."));
    assert!(system_text.contains("The user's name is Ada Lovelace."));
    assert!(system_text.contains("They prefer trains."));
}

#[tokio::test]
async fn test_budget_handoff_reaches_sub_agent() {
    let mock = Arc::new(
        MockLlm::new("gemini-2.0-flash")
            .with_turn(vec![LlmResponse::new(Content {
                role: "model".to_string(),
                parts: vec![Part::FunctionCall {
                    name: "transfer_to_agent".to_string(),
                    args: json!({"agent_name": "Budget Assistant"}),
                    id: None,
                }],
            })])
            .with_text_turn("Try shoulder season for cheaper flights."),
    );

    let runner = runner_for(mock.clone(), AgentMode::Full);
    let response = collect_response(
        runner
            .run(web_profile(), Content::new("user").with_text("Cheapest time to fly?"))
            .await
            .unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(response, "Try shoulder season for cheaper flights.");
    assert_eq!(mock.call_count(), 2);

    // The budget agent's request starts from its own instruction.
    let budget_request = &mock.requests()[1];
    assert!(budget_request.contents[0].text().starts_with("Assist user with budget-specific"));
}
