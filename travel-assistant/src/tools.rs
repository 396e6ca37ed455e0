//! Demo tools carried by the full agent definition.

use rand::Rng;
use serde_json::json;
use travel_agent::FunctionTool;
use travel_core::AssistantError;

/// Weather lookup stand-in: answers with a uniformly random temperature
/// between -10 and 34 degrees inclusive.
pub fn fetch_weather_tool() -> FunctionTool {
    FunctionTool::new(
        "fetch_weather",
        "Fetch the current weather for a location.",
        |_ctx, args| async move {
            let location = args
                .get("location")
                .and_then(|v| v.as_str())
                .ok_or_else(|| {
                    AssistantError::Tool("fetch_weather requires a location argument".to_string())
                })?
                .to_string();

            let temperature = rand::thread_rng().gen_range(-10..=34);
            Ok(json!(format!("the weather of {location} is {temperature}°C")))
        },
    )
    .with_parameters(json!({
        "type": "object",
        "properties": {
            "location": {
                "type": "string",
                "description": "City or region to look up."
            }
        },
        "required": ["location"]
    }))
}

/// Restaurant lookup stand-in: always returns the same two entries.
pub fn find_restaurants_tool() -> FunctionTool {
    FunctionTool::new(
        "find_restaurants",
        "Ask user about the city and cuisine",
        |_ctx, args| async move {
            let cuisine = args.get("cuisine").and_then(|v| v.as_str()).unwrap_or("any");
            tracing::debug!(cuisine, "returning fixed restaurant list");

            Ok(json!([
                {"name": "Green Leaf", "cuisine": "Vegan", "rating": 4.7},
                {"name": "Pizza Roma", "cuisine": "Italian", "rating": 4.5}
            ]))
        },
    )
    .with_parameters(json!({
        "type": "object",
        "properties": {
            "cuisine": {
                "type": "string",
                "description": "Preferred cuisine, e.g. vegan or italian."
            }
        },
        "required": ["cuisine"]
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use travel_core::{Content, InvocationContext, Tool, ToolContext, UserProfile};

    struct TestContext {
        content: Content,
        profile: UserProfile,
    }

    impl TestContext {
        fn arc() -> Arc<dyn ToolContext> {
            Arc::new(Self {
                content: Content::new("user").with_text("hi"),
                profile: UserProfile::new("Test User", vec![]),
            })
        }
    }

    impl InvocationContext for TestContext {
        fn invocation_id(&self) -> &str {
            "inv-test"
        }
        fn app_name(&self) -> &str {
            "travel_tests"
        }
        fn user_content(&self) -> &Content {
            &self.content
        }
        fn profile(&self) -> &UserProfile {
            &self.profile
        }
    }

    impl ToolContext for TestContext {
        fn function_call_id(&self) -> &str {
            "call_test"
        }
    }

    #[tokio::test]
    async fn test_fetch_weather_format_and_range() {
        let tool = fetch_weather_tool();
        let result = tool
            .execute(TestContext::arc(), json!({"location": "Lisbon"}))
            .await
            .unwrap();

        let text = result.as_str().unwrap();
        assert!(text.starts_with("the weather of Lisbon is "));
        assert!(text.ends_with("°C"));

        let degrees: i32 = text
            .trim_start_matches("the weather of Lisbon is ")
            .trim_end_matches("°C")
            .parse()
            .unwrap();
        assert!((-10..=34).contains(&degrees));
    }

    #[tokio::test]
    async fn test_fetch_weather_requires_location() {
        let tool = fetch_weather_tool();
        let err = tool.execute(TestContext::arc(), json!({})).await.unwrap_err();
        assert!(err.to_string().contains("location"));
    }

    #[tokio::test]
    async fn test_find_restaurants_fixed_list() {
        let tool = find_restaurants_tool();
        let result = tool
            .execute(TestContext::arc(), json!({"cuisine": "vegan"}))
            .await
            .unwrap();

        let entries = result.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["name"], "Green Leaf");
        assert_eq!(entries[0]["rating"], 4.7);
        assert_eq!(entries[1]["cuisine"], "Italian");
    }

    #[test]
    fn test_tool_schemas_declare_required_arguments() {
        let weather = fetch_weather_tool();
        let schema = weather.parameters_schema().unwrap();
        assert_eq!(schema["required"][0], "location");

        let restaurants = find_restaurants_tool();
        let schema = restaurants.parameters_schema().unwrap();
        assert_eq!(schema["required"][0], "cuisine");
    }
}
