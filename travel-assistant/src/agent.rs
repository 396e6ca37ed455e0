//! The travel agent tree: root travel agent, budget sub-agent, keyword
//! guardrail, and the profile-driven dynamic instruction.

use crate::tools::{fetch_weather_tool, find_restaurants_tool};
use std::str::FromStr;
use std::sync::Arc;
use travel_agent::{ContentFilter, GuardrailSet, LlmAgent, LlmAgentBuilder};
use travel_core::{AssistantError, InstructionProvider, Llm, Result};

pub const TRAVEL_AGENT_NAME: &str = "Smart Travel Assistant";
pub const BUDGET_AGENT_NAME: &str = "Budget Assistant";

const TRAVEL_INSTRUCTION: &str =
    "Assist users in planning trips with weather, restaurants, and itineraries.";
const BUDGET_INSTRUCTION: &str = "Assist user with budget-specific queries";
const BUDGET_DESCRIPTION: &str =
    "If the user asks budget-specific queries, handoff to a BudgetAgent";

/// Keywords rejected by the input guardrail.
pub const BLOCKED_KEYWORDS: &[&str] = &["hack", "exploit", "virus", "malware"];

/// Selects between the two agent definitions: `Full` carries the demo
/// tools, `Basic` relies on the model alone. Everything else is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentMode {
    Full,
    Basic,
}

impl FromStr for AgentMode {
    type Err = AssistantError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "full" => Ok(AgentMode::Full),
            "basic" => Ok(AgentMode::Basic),
            other => Err(AssistantError::Config(format!("unknown agent mode: {other}"))),
        }
    }
}

/// Dynamic instruction derived from the per-request user profile.
fn profile_instructions() -> InstructionProvider {
    Box::new(|ctx| {
        Box::pin(async move {
            let profile = ctx.profile();
            Ok(format!(
                "The user's name is {}. They prefer {}. Tailor restaurant and itinerary \
                 suggestions accordingly.",
                profile.name,
                profile.preferences_summary()
            ))
        })
    })
}

/// Build the agent tree for the given mode: the travel agent at the root
/// with the budget agent reachable by handoff.
pub fn build_travel_agent(model: Arc<dyn Llm>, mode: AgentMode) -> Result<LlmAgent> {
    let budget = LlmAgentBuilder::new(BUDGET_AGENT_NAME)
        .description(BUDGET_DESCRIPTION)
        .model(model.clone())
        .instruction(BUDGET_INSTRUCTION)
        .build()?;

    let guardrails = GuardrailSet::new().with(ContentFilter::blocked_keywords(
        BLOCKED_KEYWORDS.iter().map(|k| k.to_string()).collect(),
    ));

    let mut builder = LlmAgentBuilder::new(TRAVEL_AGENT_NAME)
        .description("Helps users plan trips.")
        .model(model)
        .instruction(TRAVEL_INSTRUCTION)
        .instruction_provider(profile_instructions())
        .input_guardrails(guardrails)
        .sub_agent(Arc::new(budget));

    if mode == AgentMode::Full {
        builder = builder
            .tool(Arc::new(fetch_weather_tool()))
            .tool(Arc::new(find_restaurants_tool()));
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use travel_core::{Agent, Tool};
    use travel_model::MockLlm;

    fn mock_model() -> Arc<dyn Llm> {
        Arc::new(MockLlm::new("gemini-2.0-flash"))
    }

    #[test]
    fn test_agent_mode_parses_case_insensitively() {
        assert_eq!("full".parse::<AgentMode>().unwrap(), AgentMode::Full);
        assert_eq!("FULL".parse::<AgentMode>().unwrap(), AgentMode::Full);
        assert_eq!("Basic".parse::<AgentMode>().unwrap(), AgentMode::Basic);

        let err = "turbo".parse::<AgentMode>().unwrap_err();
        assert!(matches!(err, AssistantError::Config(_)));
    }

    #[test]
    fn test_full_agent_carries_both_tools() {
        let agent = build_travel_agent(mock_model(), AgentMode::Full).unwrap();

        assert_eq!(agent.name(), TRAVEL_AGENT_NAME);
        let tool_names: Vec<&str> = agent.tools().iter().map(|t| t.name()).collect();
        assert_eq!(tool_names, vec!["fetch_weather", "find_restaurants"]);
    }

    #[test]
    fn test_basic_agent_carries_no_tools() {
        let agent = build_travel_agent(mock_model(), AgentMode::Basic).unwrap();
        assert!(agent.tools().is_empty());
    }

    #[test]
    fn test_budget_agent_reachable_as_sub_agent() {
        let agent = build_travel_agent(mock_model(), AgentMode::Full).unwrap();

        assert_eq!(agent.sub_agents().len(), 1);
        let budget = &agent.sub_agents()[0];
        assert_eq!(budget.name(), BUDGET_AGENT_NAME);
        assert_eq!(budget.description(), BUDGET_DESCRIPTION);
    }
}
