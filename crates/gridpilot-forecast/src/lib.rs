//! Solar generation forecasting for the dispatch pipeline.
//!
//! Three ways to produce an estimate, in decreasing order of sophistication:
//! a remote model endpoint over HTTP, a naive trend projection over recent
//! feature rows, and a fixed stub. The provider is chosen by configuration
//! and every failure path degrades toward the stub with an explanatory note,
//! so the pipeline always gets a number.

pub mod projection;
pub mod provider;
pub mod types;

pub use projection::naive_projection;
pub use provider::Forecaster;
pub use types::{FeatureRow, Forecast};

/// The fixed fallback estimate when no model is reachable.
pub fn stub_forecast() -> Forecast {
    Forecast {
        mw: 42.5,
        confidence: 0.87,
        note: None,
    }
}
