//! GridPilot — prototype agentic dispatch server.
//!
//! Chains a solar forecast call, a grounded-knowledge lookup, and a toy
//! dispatch planner into one operator-facing answer behind an HTTP API.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Fail fast on bad configuration: nothing here degrades silently.
    let config = gridpilot_core::GridPilotConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
    let llm = gridpilot_llm::LlmConfig::from_env();
    gridpilot_agent::orchestrator::validate_startup(&config, &llm)
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    let knowledge = gridpilot_retrieve::KnowledgeBase::from_config(config.knowledge_dir.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load knowledge base: {}", e))?;
    info!(
        "Knowledge base ready with {} snippets; LLM provider: {}",
        knowledge.len(),
        llm.active_provider().unwrap_or_else(|| "none (offline)".into())
    );

    let port = config.port;
    let agent = gridpilot_agent::DispatchAgent::new(&config, knowledge, llm);
    let state = Arc::new(AppState::new(config, agent));

    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("GridPilot server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
