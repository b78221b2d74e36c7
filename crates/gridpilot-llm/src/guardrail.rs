//! Relevance guardrail.
//!
//! A single classification call with two outcomes: the query either belongs
//! to the solar-dispatch domain or it does not. With no provider configured
//! a keyword heuristic stands in, so gating works offline.

use gridpilot_core::{Error, Result};
use once_cell::sync::Lazy;
use reqwest::Client;
use tracing::debug;

use crate::config::LlmConfig;
use crate::providers::complete;
use crate::types::ChatMessage;

/// Outcome of the relevance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelevanceVerdict {
    Relevant,
    OffTopic,
}

const CLASSIFIER_PROMPT: &str = "You are a relevance filter for a solar plant \
dispatch assistant. The assistant answers questions about solar generation \
forecasts, curtailment, battery (BESS) dispatch, and grid export. Reply with \
exactly one word: RELEVANT if the query belongs to that domain, OFF_TOPIC \
otherwise.";

static TOPIC_TERMS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "solar", "curtail", "dispatch", "battery", "batteries", "bess", "grid",
        "soc", "charge", "discharge", "forecast", "storage", "inverter",
        "export", "megawatt", "mw", "mwh", "energy", "generation", "renewable",
        "clipping", "irradiance", "pv",
    ]
});

/// Keyword fallback used when no LLM is available.
pub fn heuristic_relevance(query: &str) -> RelevanceVerdict {
    let query_lower = query.to_lowercase();
    let hit = query_lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| TOPIC_TERMS.contains(&word));
    if hit {
        RelevanceVerdict::Relevant
    } else {
        RelevanceVerdict::OffTopic
    }
}

/// Classify the query with the configured LLM provider.
///
/// Errors when no provider is configured or the reply is unusable; callers
/// decide whether to fall back to [`heuristic_relevance`].
pub async fn classify_relevance(
    client: &Client,
    config: &LlmConfig,
    query: &str,
) -> Result<RelevanceVerdict> {
    let (provider, model, api_key) = config
        .resolve_provider()
        .ok_or_else(|| Error::Llm("no LLM provider configured".into()))?;

    let messages = [
        ChatMessage::system(CLASSIFIER_PROMPT),
        ChatMessage::user(query),
    ];
    let completion = complete(client, provider, &messages, &model, &api_key, 0.0, 16).await?;

    let reply = completion.text.to_uppercase();
    debug!("Guardrail classification for query: {}", reply.trim());

    if reply.contains("OFF_TOPIC") || reply.contains("OFF-TOPIC") {
        Ok(RelevanceVerdict::OffTopic)
    } else if reply.contains("RELEVANT") {
        Ok(RelevanceVerdict::Relevant)
    } else {
        Err(Error::Llm(format!(
            "unusable guardrail reply: {}",
            completion.text
        )))
    }
}
