use crate::context::InvocationContext;
use async_stream::stream;
use futures::StreamExt;
use std::sync::Arc;
use tracing::info;
use travel_core::{Agent, AssistantError, Content, EventStream, Result, UserProfile};

/// How many agent-to-agent handoffs a single invocation may make before the
/// runner gives up. Guards against two agents transferring to each other
/// forever.
const MAX_TRANSFERS: usize = 3;

pub struct RunnerConfig {
    pub app_name: String,
    pub agent: Arc<dyn Agent>,
}

/// Drives one invocation end to end: builds the context, runs the root
/// agent, and follows transfer events to sub-agents until an agent finishes
/// without handing off.
pub struct Runner {
    app_name: String,
    root_agent: Arc<dyn Agent>,
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { app_name: config.app_name, root_agent: config.agent }
    }

    pub fn agent_name(&self) -> &str {
        self.root_agent.name()
    }

    pub async fn run(&self, profile: UserProfile, user_content: Content) -> Result<EventStream> {
        let invocation_id = format!("inv-{}", uuid::Uuid::new_v4());

        info!(
            app = %self.app_name,
            invocation = %invocation_id,
            agent = %self.root_agent.name(),
            "starting invocation"
        );

        let ctx: Arc<dyn travel_core::InvocationContext> = Arc::new(InvocationContext::new(
            invocation_id,
            self.app_name.clone(),
            user_content,
            profile,
        ));

        let root_agent = self.root_agent.clone();

        let s = stream! {
            let mut current_agent = root_agent.clone();
            let mut transfers = 0;

            loop {
                let mut events = match current_agent.run(ctx.clone()).await {
                    Ok(events) => events,
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                };

                let mut transfer_target: Option<String> = None;

                while let Some(event) = events.next().await {
                    if let Ok(event) = &event {
                        if let Some(target) = &event.actions.transfer_to_agent {
                            transfer_target = Some(target.clone());
                        }
                    }
                    yield event;
                }

                let Some(target) = transfer_target else {
                    return;
                };

                transfers += 1;
                if transfers > MAX_TRANSFERS {
                    yield Err(AssistantError::Agent(format!(
                        "transfer limit ({MAX_TRANSFERS}) exceeded"
                    )));
                    return;
                }

                match find_agent(&root_agent, &target) {
                    Some(agent) => current_agent = agent,
                    None => {
                        yield Err(AssistantError::Agent(format!(
                            "transfer to unknown agent: {target}"
                        )));
                        return;
                    }
                }
            }
        };

        Ok(Box::pin(s))
    }
}

/// Depth-first search through the agent tree by name, starting at the root.
pub fn find_agent(agent: &Arc<dyn Agent>, name: &str) -> Option<Arc<dyn Agent>> {
    if agent.name() == name {
        return Some(agent.clone());
    }
    for sub in agent.sub_agents() {
        if let Some(found) = find_agent(sub, name) {
            return Some(found);
        }
    }
    None
}
