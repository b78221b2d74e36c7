//! Environment configuration.
//!
//! Everything is read from process environment at startup. Validation is
//! presence-level only: a provider that needs an endpoint fails fast when
//! the endpoint is absent, nothing more.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};

/// Which forecast backend to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastProviderKind {
    /// Fixed estimate, no outbound call.
    Stub,
    /// Deployed model endpoint over HTTP.
    Remote,
}

impl std::fmt::Display for ForecastProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForecastProviderKind::Stub => write!(f, "stub"),
            ForecastProviderKind::Remote => write!(f, "remote"),
        }
    }
}

/// Forecast backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    pub provider: ForecastProviderKind,
    /// Prediction endpoint URL (required for `remote`).
    pub endpoint_url: Option<String>,
    /// Bearer token for the endpoint, if it needs one.
    pub api_key: Option<String>,
    /// Plant location identifier forwarded to the endpoint.
    pub location: Option<String>,
    /// Optional JSON file of recent feature rows for trend projection.
    pub history_file: Option<PathBuf>,
}

/// Relevance guardrail behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuardrailMode {
    /// LLM classification when a provider is configured, keyword heuristic otherwise.
    Auto,
    /// LLM classification required; startup fails without a provider.
    Strict,
    /// No gating, every query runs the pipeline.
    Off,
}

impl std::fmt::Display for GuardrailMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GuardrailMode::Auto => write!(f, "auto"),
            GuardrailMode::Strict => write!(f, "strict"),
            GuardrailMode::Off => write!(f, "off"),
        }
    }
}

/// Top-level GridPilot configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridPilotConfig {
    /// HTTP server port.
    pub port: u16,
    /// Knowledge corpus directory; compiled-in snippets when absent.
    pub knowledge_dir: Option<PathBuf>,
    pub forecast: ForecastConfig,
    pub guardrail: GuardrailMode,
}

impl GridPilotConfig {
    /// Read configuration from the environment.
    pub fn from_env() -> Result<Self> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let knowledge_dir = std::env::var("GRIDPILOT_KNOWLEDGE_DIR")
            .ok()
            .map(PathBuf::from);

        let provider = match std::env::var("FORECAST_PROVIDER")
            .unwrap_or_else(|_| "stub".into())
            .to_lowercase()
            .as_str()
        {
            "stub" => ForecastProviderKind::Stub,
            // "vertex" kept as an alias for deployments that still set it.
            "remote" | "vertex" => ForecastProviderKind::Remote,
            other => {
                return Err(Error::Config(format!(
                    "Unknown FORECAST_PROVIDER '{}' (expected 'stub' or 'remote')",
                    other
                )))
            }
        };

        let endpoint_url = std::env::var("FORECAST_ENDPOINT_URL").ok();
        if provider == ForecastProviderKind::Remote && endpoint_url.is_none() {
            return Err(Error::Config(
                "FORECAST_PROVIDER=remote requires FORECAST_ENDPOINT_URL".into(),
            ));
        }

        let guardrail = match std::env::var("GRIDPILOT_GUARDRAIL")
            .unwrap_or_else(|_| "auto".into())
            .to_lowercase()
            .as_str()
        {
            "auto" => GuardrailMode::Auto,
            "strict" => GuardrailMode::Strict,
            "off" => GuardrailMode::Off,
            other => {
                return Err(Error::Config(format!(
                    "Unknown GRIDPILOT_GUARDRAIL '{}' (expected 'auto', 'strict' or 'off')",
                    other
                )))
            }
        };

        let config = Self {
            port,
            knowledge_dir,
            forecast: ForecastConfig {
                provider,
                endpoint_url,
                api_key: std::env::var("FORECAST_API_KEY").ok(),
                location: std::env::var("FORECAST_LOCATION").ok(),
                history_file: std::env::var("FORECAST_HISTORY_FILE").ok().map(PathBuf::from),
            },
            guardrail,
        };

        info!(
            "Configuration loaded: port={}, forecast={}, guardrail={}",
            config.port, config.forecast.provider, config.guardrail
        );

        Ok(config)
    }
}

impl Default for GridPilotConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            knowledge_dir: None,
            forecast: ForecastConfig {
                provider: ForecastProviderKind::Stub,
                endpoint_url: None,
                api_key: None,
                location: None,
                history_file: None,
            },
            guardrail: GuardrailMode::Auto,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var tests mutate shared process state; keep them in one test so
    // the default test runner's threads can't interleave them.
    #[test]
    fn test_from_env() {
        std::env::remove_var("PORT");
        std::env::remove_var("FORECAST_PROVIDER");
        std::env::remove_var("FORECAST_ENDPOINT_URL");
        std::env::remove_var("GRIDPILOT_GUARDRAIL");
        std::env::remove_var("GRIDPILOT_KNOWLEDGE_DIR");

        let config = GridPilotConfig::from_env().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.forecast.provider, ForecastProviderKind::Stub);
        assert_eq!(config.guardrail, GuardrailMode::Auto);
        assert!(config.knowledge_dir.is_none());

        // Remote forecast without an endpoint is a startup error.
        std::env::set_var("FORECAST_PROVIDER", "remote");
        assert!(GridPilotConfig::from_env().is_err());

        std::env::set_var("FORECAST_ENDPOINT_URL", "http://localhost:9000/predict");
        let config = GridPilotConfig::from_env().unwrap();
        assert_eq!(config.forecast.provider, ForecastProviderKind::Remote);
        assert_eq!(
            config.forecast.endpoint_url.as_deref(),
            Some("http://localhost:9000/predict")
        );

        // Legacy alias maps to remote.
        std::env::set_var("FORECAST_PROVIDER", "vertex");
        let config = GridPilotConfig::from_env().unwrap();
        assert_eq!(config.forecast.provider, ForecastProviderKind::Remote);

        std::env::set_var("GRIDPILOT_GUARDRAIL", "bogus");
        assert!(GridPilotConfig::from_env().is_err());
        std::env::set_var("GRIDPILOT_GUARDRAIL", "strict");
        let config = GridPilotConfig::from_env().unwrap();
        assert_eq!(config.guardrail, GuardrailMode::Strict);

        std::env::remove_var("FORECAST_PROVIDER");
        std::env::remove_var("FORECAST_ENDPOINT_URL");
        std::env::remove_var("GRIDPILOT_GUARDRAIL");
    }
}
