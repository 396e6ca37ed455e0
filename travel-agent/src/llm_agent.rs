use crate::guardrail::{GuardrailResult, GuardrailSet};
use async_stream::stream;
use async_trait::async_trait;
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};
use travel_core::{
    Agent, AssistantError, Content, Event, EventStream, GenerateContentConfig, InstructionProvider,
    InvocationContext, Llm, LlmRequest, Part, Result, Tool, ToolContext,
};

const TRANSFER_TOOL_NAME: &str = "transfer_to_agent";

/// Upper bound on model round-trips within one invocation. Each tool call
/// cycle costs one round-trip, so a well-behaved turn stays far below this.
const MAX_ITERATIONS: usize = 8;

/// An agent that drives an LLM in a loop: validate input, stream the model's
/// turn, execute any requested tools, feed results back, repeat until the
/// model answers in plain text or hands off to a sub-agent.
pub struct LlmAgent {
    name: String,
    description: String,
    model: Arc<dyn Llm>,
    instruction: Option<String>,
    instruction_provider: Option<Arc<InstructionProvider>>,
    generate_config: Option<GenerateContentConfig>,
    input_guardrails: Arc<GuardrailSet>,
    tools: Vec<Arc<dyn Tool>>,
    sub_agents: Vec<Arc<dyn Agent>>,
}

impl std::fmt::Debug for LlmAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmAgent")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("model", &self.model.name())
            .field("instruction", &self.instruction)
            .field("guardrails", &self.input_guardrails.len())
            .field("tools_count", &self.tools.len())
            .field("sub_agents_count", &self.sub_agents.len())
            .finish()
    }
}

impl LlmAgent {
    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }
}

pub struct LlmAgentBuilder {
    name: String,
    description: Option<String>,
    model: Option<Arc<dyn Llm>>,
    instruction: Option<String>,
    instruction_provider: Option<Arc<InstructionProvider>>,
    generate_config: Option<GenerateContentConfig>,
    input_guardrails: GuardrailSet,
    tools: Vec<Arc<dyn Tool>>,
    sub_agents: Vec<Arc<dyn Agent>>,
}

impl LlmAgentBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            model: None,
            instruction: None,
            instruction_provider: None,
            generate_config: None,
            input_guardrails: GuardrailSet::new(),
            tools: Vec::new(),
            sub_agents: Vec::new(),
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn model(mut self, model: Arc<dyn Llm>) -> Self {
        self.model = Some(model);
        self
    }

    /// Static system instruction, sent at the start of every request.
    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }

    /// Dynamic instruction derived from the invocation, appended after the
    /// static instruction.
    pub fn instruction_provider(mut self, provider: InstructionProvider) -> Self {
        self.instruction_provider = Some(Arc::new(provider));
        self
    }

    pub fn generate_config(mut self, config: GenerateContentConfig) -> Self {
        self.generate_config = Some(config);
        self
    }

    /// Guardrails validated against the user content before any model call.
    pub fn input_guardrails(mut self, guardrails: GuardrailSet) -> Self {
        self.input_guardrails = guardrails;
        self
    }

    pub fn tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn sub_agent(mut self, agent: Arc<dyn Agent>) -> Self {
        self.sub_agents.push(agent);
        self
    }

    pub fn build(self) -> Result<LlmAgent> {
        let model =
            self.model.ok_or_else(|| AssistantError::Agent("Model is required".to_string()))?;

        Ok(LlmAgent {
            name: self.name,
            description: self.description.unwrap_or_default(),
            model,
            instruction: self.instruction,
            instruction_provider: self.instruction_provider,
            generate_config: self.generate_config,
            input_guardrails: Arc::new(self.input_guardrails),
            tools: self.tools,
            sub_agents: self.sub_agents,
        })
    }
}

// Wraps the parent InvocationContext so tools see the full invocation plus
// the identity of the call being served.
struct AgentToolContext {
    parent_ctx: Arc<dyn InvocationContext>,
    function_call_id: String,
}

impl AgentToolContext {
    fn new(parent_ctx: Arc<dyn InvocationContext>, function_call_id: String) -> Self {
        Self { parent_ctx, function_call_id }
    }
}

impl InvocationContext for AgentToolContext {
    fn invocation_id(&self) -> &str {
        self.parent_ctx.invocation_id()
    }

    fn app_name(&self) -> &str {
        self.parent_ctx.app_name()
    }

    fn user_content(&self) -> &Content {
        self.parent_ctx.user_content()
    }

    fn profile(&self) -> &travel_core::UserProfile {
        self.parent_ctx.profile()
    }
}

impl ToolContext for AgentToolContext {
    fn function_call_id(&self) -> &str {
        &self.function_call_id
    }
}

#[async_trait]
impl Agent for LlmAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn sub_agents(&self) -> &[Arc<dyn Agent>] {
        &self.sub_agents
    }

    async fn run(&self, ctx: Arc<dyn InvocationContext>) -> Result<EventStream> {
        info!(
            agent = %self.name,
            invocation = %ctx.invocation_id(),
            user = %ctx.profile().name,
            "starting agent"
        );

        let agent_name = self.name.clone();
        let invocation_id = ctx.invocation_id().to_string();
        let model = self.model.clone();
        let tools = self.tools.clone();
        let sub_agents = self.sub_agents.clone();
        let instruction = self.instruction.clone();
        let instruction_provider = self.instruction_provider.clone();
        let generate_config = self.generate_config.clone();
        let guardrails = self.input_guardrails.clone();

        let s = stream! {
            // Guardrails run first; a failure means the model is never
            // called for this invocation.
            if let GuardrailResult::Fail { reason, .. } =
                guardrails.validate(ctx.user_content()).await
            {
                yield Err(AssistantError::GuardrailBlocked(reason));
                return;
            }

            // Assemble the system instruction: static text first, then
            // whatever the provider derives from this invocation.
            let mut system_text = instruction.unwrap_or_default();
            if let Some(provider) = &instruction_provider {
                match provider(ctx.clone()).await {
                    Ok(dynamic) if !dynamic.is_empty() => {
                        if !system_text.is_empty() {
                            system_text.push('\n');
                        }
                        system_text.push_str(&dynamic);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }

            let mut conversation = Vec::new();
            if !system_text.is_empty() {
                conversation.push(Content::new("system").with_text(system_text));
            }
            conversation.push(ctx.user_content().clone());

            // Tool declarations sent with every request.
            let mut tool_declarations = HashMap::new();
            for tool in &tools {
                let mut decl = serde_json::json!({
                    "name": tool.name(),
                    "description": tool.description(),
                });
                if let Some(params) = tool.parameters_schema() {
                    decl["parameters"] = params;
                }
                tool_declarations.insert(tool.name().to_string(), decl);
            }

            if !sub_agents.is_empty() {
                tool_declarations
                    .insert(TRANSFER_TOOL_NAME.to_string(), transfer_declaration(&sub_agents));
            }

            let mut iteration = 0;
            loop {
                iteration += 1;
                if iteration > MAX_ITERATIONS {
                    yield Err(AssistantError::Agent(format!(
                        "max iterations ({MAX_ITERATIONS}) exceeded"
                    )));
                    return;
                }

                let request = LlmRequest {
                    model: model.name().to_string(),
                    contents: conversation.clone(),
                    config: generate_config.clone(),
                    tools: tool_declarations.clone(),
                };

                let mut response_stream = match model.generate_content(request, true).await {
                    Ok(s) => s,
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                };

                // Accumulate the model's turn while forwarding each chunk
                // as an event.
                let mut accumulated: Option<Content> = None;

                while let Some(chunk_result) = response_stream.next().await {
                    let chunk = match chunk_result {
                        Ok(c) => c,
                        Err(e) => {
                            yield Err(e);
                            return;
                        }
                    };

                    let turn_complete = chunk.turn_complete;

                    if let Some(chunk_content) = chunk.content.clone() {
                        merge_content(&mut accumulated, chunk_content);
                    }

                    let mut event = Event::new(&invocation_id);
                    event.author = agent_name.clone();
                    event.llm_response = chunk;
                    yield Ok(event);

                    if turn_complete {
                        break;
                    }
                }

                let calls: Vec<(String, serde_json::Value, Option<String>)> = accumulated
                    .as_ref()
                    .map(|content| {
                        content
                            .parts
                            .iter()
                            .filter_map(|part| {
                                if let Part::FunctionCall { name, args, id } = part {
                                    Some((name.clone(), args.clone(), id.clone()))
                                } else {
                                    None
                                }
                            })
                            .collect()
                    })
                    .unwrap_or_default();

                if let Some(content) = accumulated {
                    conversation.push(content);
                }

                if calls.is_empty() {
                    break;
                }

                for (name, args, call_id) in calls {
                    // A transfer ends this agent's stream; the runner picks
                    // the invocation up from the transfer event.
                    if name == TRANSFER_TOOL_NAME {
                        let target = args
                            .get("agent_name")
                            .and_then(|v| v.as_str())
                            .unwrap_or_default()
                            .to_string();

                        info!(agent = %agent_name, target = %target, "transferring invocation");

                        let mut transfer_event = Event::new(&invocation_id);
                        transfer_event.author = agent_name.clone();
                        transfer_event.actions.transfer_to_agent = Some(target);
                        yield Ok(transfer_event);
                        return;
                    }

                    let call_id =
                        call_id.unwrap_or_else(|| format!("{invocation_id}_{name}"));

                    info!(tool = %name, args = %args, "tool call started");

                    let result = if let Some(tool) = tools.iter().find(|t| t.name() == name) {
                        let tool_ctx: Arc<dyn ToolContext> =
                            Arc::new(AgentToolContext::new(ctx.clone(), call_id.clone()));
                        match tool.execute(tool_ctx, args.clone()).await {
                            Ok(result) => {
                                info!(tool = %name, "tool call finished");
                                result
                            }
                            Err(e) => {
                                warn!(tool = %name, error = %e, "tool call failed");
                                serde_json::json!({ "error": e.to_string() })
                            }
                        }
                    } else {
                        warn!(tool = %name, "tool not found");
                        serde_json::json!({ "error": format!("Tool {name} not found") })
                    };

                    let response_content = Content {
                        role: "function".to_string(),
                        parts: vec![Part::function_response(&name, result, Some(call_id))],
                    };

                    let mut tool_event = Event::new(&invocation_id);
                    tool_event.author = agent_name.clone();
                    tool_event.set_content(response_content.clone());
                    yield Ok(tool_event);

                    conversation.push(response_content);
                }
            }
        };

        Ok(Box::pin(s))
    }
}

/// Fold a chunk's parts into the accumulated turn, joining consecutive text
/// deltas into a single part so history stays readable for the model.
fn merge_content(accumulated: &mut Option<Content>, chunk: Content) {
    let Some(acc) = accumulated else {
        *accumulated = Some(chunk);
        return;
    };

    for part in chunk.parts {
        if let Part::Text { text: delta } = &part {
            if let Some(Part::Text { text }) = acc.parts.last_mut() {
                text.push_str(delta);
                continue;
            }
        }
        acc.parts.push(part);
    }
}

fn transfer_declaration(sub_agents: &[Arc<dyn Agent>]) -> serde_json::Value {
    let names: Vec<&str> = sub_agents.iter().map(|a| a.name()).collect();
    let roster = sub_agents
        .iter()
        .map(|a| format!("{}: {}", a.name(), a.description()))
        .collect::<Vec<_>>()
        .join("; ");

    serde_json::json!({
        "name": TRANSFER_TOOL_NAME,
        "description": format!("Transfer the conversation to another agent. Available agents: {roster}"),
        "parameters": {
            "type": "object",
            "properties": {
                "agent_name": {
                    "type": "string",
                    "description": "The name of the agent to transfer to.",
                    "enum": names
                }
            },
            "required": ["agent_name"]
        }
    })
}
