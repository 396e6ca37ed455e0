//! Interactive console for the travel assistant. Streams one invocation per
//! line typed, printing text deltas as they arrive.

use anyhow::Context;
use futures::StreamExt;
use rustyline::DefaultEditor;
use std::io::Write;
use std::sync::Arc;
use travel_agent::{Runner, RunnerConfig};
use travel_assistant::agent::{build_travel_agent, AgentMode};
use travel_assistant::replies::{FAILURE_REPLY, GUARDRAIL_REPLY};
use travel_assistant::{APP_NAME, DEFAULT_BASE_URL, DEFAULT_MODEL};
use travel_core::{AssistantError, Content, Part, UserProfile};
use travel_model::{OpenAICompatible, OpenAICompatibleConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let api_key = std::env::var("GEMINI_API_KEY").context("GEMINI_API_KEY must be set")?;
    let model_name = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
    let base_url = std::env::var("BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let mode: AgentMode = std::env::var("AGENT_MODE")
        .unwrap_or_else(|_| "full".to_string())
        .parse()?;

    let model = OpenAICompatible::new(
        OpenAICompatibleConfig::new(api_key, model_name.clone())
            .with_provider_name("gemini")
            .with_base_url(base_url),
    )?;

    let agent = build_travel_agent(Arc::new(model), mode)?;
    let runner = Runner::new(RunnerConfig {
        app_name: APP_NAME.to_string(),
        agent: Arc::new(agent),
    });

    let profile =
        UserProfile::new("Marjan Ahmed", vec!["vegan".to_string(), "museums".to_string()]);

    let mut rl = DefaultEditor::new()?;

    println!("Smart Travel Assistant ({mode:?} mode, model {model_name})");
    println!("Type your message and press Enter. Ctrl+C to exit.\n");

    loop {
        match rl.readline("You -> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                rl.add_history_entry(&line)?;

                let user_content = Content::new("user").with_text(line);
                print!("\nAssistant -> ");

                match runner.run(profile.clone(), user_content).await {
                    Ok(mut events) => {
                        while let Some(event) = events.next().await {
                            match event {
                                Ok(event) => {
                                    if let Some(content) = event.content() {
                                        for part in &content.parts {
                                            if let Part::Text { text } = part {
                                                print!("{text}");
                                                std::io::stdout().flush().ok();
                                            }
                                        }
                                    }
                                }
                                Err(AssistantError::GuardrailBlocked(_)) => {
                                    print!("{GUARDRAIL_REPLY}");
                                    break;
                                }
                                Err(e) => {
                                    tracing::error!(error = %e, "invocation failed");
                                    print!("{FAILURE_REPLY}");
                                    break;
                                }
                            }
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "invocation failed");
                        print!("{FAILURE_REPLY}");
                    }
                }

                println!("\n");
            }
            Err(rustyline::error::ReadlineError::Interrupted)
            | Err(rustyline::error::ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Error: {err}");
                break;
            }
        }
    }

    Ok(())
}
