//! Status route — the operator's "is it wired up" probe.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/status", get(get_status))
}

async fn get_status(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let llm = state.agent.llm();
    let stats = *state.stats.read();

    Json(serde_json::json!({
        "llmAvailable": llm.is_configured(),
        "llmProvider": llm.active_provider(),
        "forecastProvider": state.config.forecast.provider.to_string(),
        "guardrail": state.agent.guardrail().to_string(),
        "knowledgeSnippets": state.agent.knowledge_snippets(),
        "queriesServed": stats.served,
        "queriesRejected": stats.rejected,
    }))
}
