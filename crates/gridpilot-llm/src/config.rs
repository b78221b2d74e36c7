//! LLM provider configuration and selection.

use crate::types::LlmProvider;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";

/// Known placeholder values that templates ship in `.env` files; a key
/// matching one of these is treated as absent.
const PLACEHOLDER_KEYS: &[&str] = &[
    "your_openai_api_key_here",
    "your_openai_key_here",
    "your_api_key_here",
    "replace_me",
    "changeme",
];

/// LLM configuration, read once from the environment at startup. Never
/// serialized; keys stay in memory.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub preferred_provider: String,
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub openai_model: String,
    pub anthropic_model: String,
    pub groq_model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            preferred_provider: "auto".into(),
            openai_api_key: None,
            anthropic_api_key: None,
            groq_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.into(),
            anthropic_model: DEFAULT_ANTHROPIC_MODEL.into(),
            groq_model: DEFAULT_GROQ_MODEL.into(),
        }
    }
}

fn env_key(name: &str) -> Option<String> {
    let value = std::env::var(name).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() || PLACEHOLDER_KEYS.contains(&trimmed.to_lowercase().as_str()) {
        return None;
    }
    Some(trimmed.to_string())
}

impl LlmConfig {
    /// Read keys and model overrides from the environment.
    pub fn from_env() -> Self {
        Self {
            preferred_provider: std::env::var("GRIDPILOT_LLM_PROVIDER")
                .unwrap_or_else(|_| "auto".into())
                .to_lowercase(),
            openai_api_key: env_key("OPENAI_API_KEY"),
            anthropic_api_key: env_key("ANTHROPIC_API_KEY"),
            groq_api_key: env_key("GROQ_API_KEY"),
            openai_model: std::env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.into()),
            anthropic_model: std::env::var("ANTHROPIC_MODEL")
                .unwrap_or_else(|_| DEFAULT_ANTHROPIC_MODEL.into()),
            groq_model: std::env::var("GROQ_MODEL")
                .unwrap_or_else(|_| DEFAULT_GROQ_MODEL.into()),
        }
    }

    /// Resolve which provider, model, and key to use.
    pub fn resolve_provider(&self) -> Option<(LlmProvider, String, String)> {
        if self.preferred_provider != "auto" {
            return match self.preferred_provider.as_str() {
                "openai" => self
                    .openai_api_key
                    .as_ref()
                    .map(|k| (LlmProvider::OpenAI, self.openai_model.clone(), k.clone())),
                "anthropic" => self
                    .anthropic_api_key
                    .as_ref()
                    .map(|k| (LlmProvider::Anthropic, self.anthropic_model.clone(), k.clone())),
                "groq" => self
                    .groq_api_key
                    .as_ref()
                    .map(|k| (LlmProvider::Groq, self.groq_model.clone(), k.clone())),
                _ => None,
            };
        }

        // Auto mode: Anthropic > Groq > OpenAI.
        if let Some(k) = &self.anthropic_api_key {
            return Some((LlmProvider::Anthropic, self.anthropic_model.clone(), k.clone()));
        }
        if let Some(k) = &self.groq_api_key {
            return Some((LlmProvider::Groq, self.groq_model.clone(), k.clone()));
        }
        if let Some(k) = &self.openai_api_key {
            return Some((LlmProvider::OpenAI, self.openai_model.clone(), k.clone()));
        }

        None
    }

    pub fn is_configured(&self) -> bool {
        self.resolve_provider().is_some()
    }

    /// Active provider name for status reporting; never exposes keys.
    pub fn active_provider(&self) -> Option<String> {
        self.resolve_provider().map(|(p, _, _)| p.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_resolves_to_none() {
        let config = LlmConfig::default();
        assert!(config.resolve_provider().is_none());
        assert!(!config.is_configured());
    }

    #[test]
    fn test_auto_priority() {
        let config = LlmConfig {
            openai_api_key: Some("sk-1".into()),
            groq_api_key: Some("gq-1".into()),
            anthropic_api_key: Some("an-1".into()),
            ..LlmConfig::default()
        };
        let (provider, model, key) = config.resolve_provider().unwrap();
        assert_eq!(provider, LlmProvider::Anthropic);
        assert_eq!(model, DEFAULT_ANTHROPIC_MODEL);
        assert_eq!(key, "an-1");
    }

    #[test]
    fn test_explicit_preference() {
        let config = LlmConfig {
            preferred_provider: "openai".into(),
            openai_api_key: Some("sk-1".into()),
            anthropic_api_key: Some("an-1".into()),
            ..LlmConfig::default()
        };
        let (provider, _, _) = config.resolve_provider().unwrap();
        assert_eq!(provider, LlmProvider::OpenAI);
    }

    #[test]
    fn test_preference_without_key_is_none() {
        let config = LlmConfig {
            preferred_provider: "groq".into(),
            openai_api_key: Some("sk-1".into()),
            ..LlmConfig::default()
        };
        assert!(config.resolve_provider().is_none());
    }

    #[test]
    fn test_placeholder_keys_are_ignored() {
        std::env::set_var("OPENAI_API_KEY", "your_openai_api_key_here");
        let config = LlmConfig::from_env();
        assert!(config.openai_api_key.is_none());
        std::env::remove_var("OPENAI_API_KEY");
    }
}
