//! Forecast types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A solar generation estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    /// Expected output in MW.
    pub mw: f64,
    /// Model confidence, 0.0 to 1.0 (0.0 when the backend reports none).
    pub confidence: f64,
    /// Set when the estimate is a degraded fallback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// One feature row of plant telemetry, as exported by the data pipeline.
///
/// Historical rows carry `target_solar_output`; future rows leave it unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureRow {
    pub forecast_timestamp: DateTime<Utc>,
    pub mean_temperature: f64,
    pub mean_wind_speed: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_solar_output: Option<f64>,
}
