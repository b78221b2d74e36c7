//! GridPilot Core — error taxonomy, configuration, shared plant types.

pub mod config;
pub mod error;
pub mod types;

pub use config::{ForecastConfig, ForecastProviderKind, GridPilotConfig, GuardrailMode};
pub use error::{Error, Result};
pub use types::PlantMeta;
