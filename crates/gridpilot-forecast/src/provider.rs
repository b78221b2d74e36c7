//! Forecast provider selection and the remote endpoint client.

use std::path::PathBuf;

use gridpilot_core::{Error, ForecastConfig, ForecastProviderKind, Result};
use tracing::{debug, warn};

use crate::projection::naive_projection;
use crate::types::{FeatureRow, Forecast};
use crate::stub_forecast;

/// Produces the solar estimate for one dispatch query.
///
/// `remote` calls a deployed prediction endpoint and degrades to the local
/// estimate on any failure. `stub` skips the network entirely.
pub struct Forecaster {
    kind: ForecastProviderKind,
    endpoint_url: Option<String>,
    api_key: Option<String>,
    location: Option<String>,
    history_file: Option<PathBuf>,
    client: reqwest::Client,
}

impl Forecaster {
    pub fn new(config: &ForecastConfig) -> Self {
        Self {
            kind: config.provider,
            endpoint_url: config.endpoint_url.clone(),
            api_key: config.api_key.clone(),
            location: config.location.clone(),
            history_file: config.history_file.clone(),
            client: reqwest::Client::new(),
        }
    }

    pub fn provider(&self) -> ForecastProviderKind {
        self.kind
    }

    /// Forecast the next hour of solar output. Never fails: degraded paths
    /// return the local estimate with a note describing what went wrong.
    pub async fn forecast(&self) -> Forecast {
        match self.kind {
            ForecastProviderKind::Stub => self.local_estimate(None),
            ForecastProviderKind::Remote => match self.remote_forecast().await {
                Ok(forecast) => forecast,
                Err(e) => {
                    warn!("Remote forecast failed, using local estimate: {}", e);
                    self.local_estimate(Some(format!("remote forecast failed: {}", e)))
                }
            },
        }
    }

    /// Stub value, or a trend projection when recent feature rows are
    /// provisioned on disk.
    fn local_estimate(&self, note: Option<String>) -> Forecast {
        let history = self.load_history();
        let Some(last) = history.iter().rev().find(|r| r.target_solar_output.is_some())
        else {
            return Forecast { note, ..stub_forecast() };
        };

        let next_hour = FeatureRow {
            forecast_timestamp: last.forecast_timestamp + chrono::Duration::hours(1),
            target_solar_output: None,
            ..last.clone()
        };
        let projected = naive_projection(&history, &[next_hour]);
        match projected.first().and_then(|r| r.target_solar_output) {
            Some(mw) => Forecast {
                mw,
                confidence: 0.5,
                note: Some(match note {
                    Some(n) => format!("{}; trend projection over {} rows", n, history.len()),
                    None => format!("trend projection over {} rows", history.len()),
                }),
            },
            None => Forecast { note, ..stub_forecast() },
        }
    }

    fn load_history(&self) -> Vec<FeatureRow> {
        let Some(path) = &self.history_file else {
            return Vec::new();
        };
        match std::fs::read_to_string(path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
                warn!("Ignoring malformed history file {}: {}", path.display(), e);
                Vec::new()
            }),
            Err(e) => {
                warn!("Cannot read history file {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    async fn remote_forecast(&self) -> Result<Forecast> {
        let url = self
            .endpoint_url
            .as_ref()
            .ok_or_else(|| Error::Config("remote forecast requires an endpoint URL".into()))?;

        let mut request = self.client.post(url).json(&serde_json::json!({
            "location": self.location,
            "horizon_hours": 1,
        }));
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Http(format!("forecast endpoint unreachable: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Forecast(format!(
                "endpoint returned {}: {}",
                status, body
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Forecast(format!("unparseable endpoint response: {}", e)))?;

        debug!("Forecast endpoint response: {}", payload);
        parse_prediction(&payload)
    }
}

/// Pull an MW estimate out of whatever shape the endpoint returned.
///
/// Accepts a bare number, `{"mw": ...}` / `{"value": ...}` /
/// `{"predicted_value": ...}` objects, or a `{"predictions": [...]}`
/// envelope around any of those. Confidence defaults to 0.0 when absent.
pub fn parse_prediction(payload: &serde_json::Value) -> Result<Forecast> {
    if let Some(mw) = payload.as_f64() {
        return Ok(Forecast { mw, confidence: 0.0, note: None });
    }

    if let Some(predictions) = payload.get("predictions").and_then(|p| p.as_array()) {
        let first = predictions
            .first()
            .ok_or_else(|| Error::Forecast("endpoint returned no predictions".into()))?;
        return parse_prediction(first);
    }

    let mw = ["mw", "value", "predicted_value"]
        .iter()
        .find_map(|key| payload.get(*key).and_then(|v| v.as_f64()))
        .ok_or_else(|| Error::Forecast(format!("no MW value in response: {}", payload)))?;

    let confidence = payload
        .get("confidence")
        .and_then(|c| c.as_f64())
        .unwrap_or(0.0);

    Ok(Forecast { mw, confidence, note: None })
}
