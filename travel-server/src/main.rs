use std::net::SocketAddr;
use std::sync::Arc;
use travel_agent::{Runner, RunnerConfig};
use travel_assistant::{build_travel_agent, APP_NAME, TRAVEL_AGENT_NAME};
use travel_model::{OpenAICompatible, OpenAICompatibleConfig};
use travel_server::{create_app, AppState, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    let model = OpenAICompatible::new(
        OpenAICompatibleConfig::new(config.api_key.clone(), config.model.clone())
            .with_provider_name("gemini")
            .with_base_url(config.base_url.clone()),
    )?;

    let agent = build_travel_agent(Arc::new(model), config.agent_mode)?;
    let runner = Runner::new(RunnerConfig {
        app_name: APP_NAME.to_string(),
        agent: Arc::new(agent),
    });

    let state = Arc::new(AppState {
        runner,
        agent_name: TRAVEL_AGENT_NAME.to_string(),
        model_name: config.model.clone(),
    });

    let app = create_app(state, &config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(
        %addr,
        model = %config.model,
        mode = ?config.agent_mode,
        "travel assistant listening"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
