//! Dispatch route — the operator query endpoint.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::state::AppState;
use gridpilot_core::PlantMeta;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/dispatch", post(dispatch))
}

/// Incoming dispatch request.
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchRequest {
    pub query: String,
    #[serde(default, rename = "plantMeta")]
    pub plant_meta: Option<PlantMeta>,
}

async fn dispatch(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DispatchRequest>,
) -> impl IntoResponse {
    let start = Instant::now();
    let request_id = Uuid::new_v4();

    if req.query.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "query must not be empty" })),
        );
    }

    info!(%request_id, "Received dispatch query: {}", req.query);

    let answer = match state.agent.run(&req.query, req.plant_meta).await {
        Ok(answer) => answer,
        Err(e) => {
            error!(%request_id, "Dispatch pipeline failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            );
        }
    };

    let rejected = answer.is_rejected();
    state.record_answer(rejected);

    let duration = start.elapsed().as_millis() as u64;
    info!(%request_id, rejected, duration_ms = duration, "Dispatch query answered");

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "query": req.query,
            "result": answer.text(),
            "rejected": rejected,
            "durationMs": duration,
        })),
    )
}
