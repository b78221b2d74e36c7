//! External LLM access for GridPilot.
//!
//! Providers speak either the OpenAI-compatible chat-completions format
//! (OpenAI, Groq) or Anthropic's Messages API. Keys come from the
//! environment; without any key the pipeline runs offline and the guardrail
//! falls back to a keyword heuristic.

pub mod config;
pub mod guardrail;
pub mod providers;
pub mod types;

pub use config::LlmConfig;
pub use guardrail::{classify_relevance, heuristic_relevance, RelevanceVerdict};
pub use types::{ChatMessage, Completion, LlmProvider};
