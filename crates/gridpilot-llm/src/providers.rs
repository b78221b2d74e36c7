//! Non-streaming completion calls.
//!
//! OpenAI and Groq share the chat-completions format; Anthropic's Messages
//! API differs in headers, system handling, and response shape.

use gridpilot_core::{Error, Result};
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::types::{ChatMessage, Completion, LlmProvider};

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Run one completion against the given provider.
pub async fn complete(
    client: &Client,
    provider: LlmProvider,
    messages: &[ChatMessage],
    model: &str,
    api_key: &str,
    temperature: f64,
    max_tokens: usize,
) -> Result<Completion> {
    match provider {
        LlmProvider::OpenAI => {
            complete_openai_compat(client, OPENAI_URL, messages, model, api_key, temperature, max_tokens).await
        }
        LlmProvider::Groq => {
            complete_openai_compat(client, GROQ_URL, messages, model, api_key, temperature, max_tokens).await
        }
        LlmProvider::Anthropic => {
            complete_anthropic(client, messages, model, api_key, temperature, max_tokens).await
        }
    }
}

async fn complete_openai_compat(
    client: &Client,
    url: &str,
    messages: &[ChatMessage],
    model: &str,
    api_key: &str,
    temperature: f64,
    max_tokens: usize,
) -> Result<Completion> {
    let body = json!({
        "model": model,
        "messages": messages,
        "temperature": temperature,
        "max_tokens": max_tokens,
    });

    debug!("Completion request to {} with model {}", url, model);

    let response = client
        .post(url)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await
        .map_err(|e| Error::Http(format!("request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Llm(format!("API error {}: {}", status, body)));
    }

    let payload: serde_json::Value = response
        .json()
        .await
        .map_err(|e| Error::Llm(format!("unparseable response: {}", e)))?;

    let text = payload["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| Error::Llm("response carried no message content".into()))?
        .to_string();
    let tokens_used = payload["usage"]["total_tokens"].as_u64().unwrap_or(0) as usize;

    Ok(Completion { text, tokens_used })
}

async fn complete_anthropic(
    client: &Client,
    messages: &[ChatMessage],
    model: &str,
    api_key: &str,
    temperature: f64,
    max_tokens: usize,
) -> Result<Completion> {
    // Anthropic takes the system prompt as a top-level field.
    let system_msg: Option<String> = messages
        .iter()
        .find(|m| m.role == "system")
        .map(|m| m.content.clone());
    let conv_msgs: Vec<&ChatMessage> = messages.iter().filter(|m| m.role != "system").collect();

    let mut body = json!({
        "model": model,
        "messages": conv_msgs,
        "temperature": temperature,
        "max_tokens": max_tokens,
    });
    if let Some(sys) = system_msg {
        body["system"] = json!(sys);
    }

    debug!("Completion request to Anthropic with model {}", model);

    let response = client
        .post(ANTHROPIC_URL)
        .header("x-api-key", api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await
        .map_err(|e| Error::Http(format!("request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Llm(format!("API error {}: {}", status, body)));
    }

    let payload: serde_json::Value = response
        .json()
        .await
        .map_err(|e| Error::Llm(format!("unparseable response: {}", e)))?;

    let text = payload["content"][0]["text"]
        .as_str()
        .ok_or_else(|| Error::Llm("response carried no text block".into()))?
        .to_string();
    let tokens_used = (payload["usage"]["input_tokens"].as_u64().unwrap_or(0)
        + payload["usage"]["output_tokens"].as_u64().unwrap_or(0)) as usize;

    Ok(Completion { text, tokens_used })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_api_surfaces_http_error() {
        // Point reqwest at a closed port via an invalid key path: the DNS
        // and connect failure must map to Error::Http, not a panic.
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(200))
            .build()
            .unwrap();
        let messages = [ChatMessage::user("hi")];
        let result = complete_openai_compat(
            &client,
            "http://127.0.0.1:1/v1/chat/completions",
            &messages,
            "gpt-4o-mini",
            "sk-test",
            0.0,
            16,
        )
        .await;
        assert!(matches!(result, Err(Error::Http(_))));
    }
}
