//! Shared plant types.

use serde::{Deserialize, Serialize};

/// Battery plant metadata supplied with a dispatch query.
///
/// Defaults describe the reference 50 MWh demo plant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlantMeta {
    /// Current state of charge, 0.0 to 1.0.
    #[serde(default = "default_soc")]
    pub soc: f64,
    /// Total energy capacity in MWh.
    #[serde(default = "default_capacity", rename = "capacityMwh")]
    pub capacity_mwh: f64,
    /// Max charge rate in MW.
    #[serde(default = "default_rate", rename = "maxChargeMw")]
    pub max_charge_mw: f64,
    /// Max discharge rate in MW.
    #[serde(default = "default_rate", rename = "maxDischargeMw")]
    pub max_discharge_mw: f64,
}

fn default_soc() -> f64 {
    0.35
}
fn default_capacity() -> f64 {
    50.0
}
fn default_rate() -> f64 {
    50.0
}

impl Default for PlantMeta {
    fn default() -> Self {
        Self {
            soc: default_soc(),
            capacity_mwh: default_capacity(),
            max_charge_mw: default_rate(),
            max_discharge_mw: default_rate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let plant = PlantMeta::default();
        assert_eq!(plant.soc, 0.35);
        assert_eq!(plant.capacity_mwh, 50.0);
        assert_eq!(plant.max_charge_mw, 50.0);
        assert_eq!(plant.max_discharge_mw, 50.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let plant: PlantMeta = serde_json::from_str(r#"{"soc": 0.6}"#).unwrap();
        assert_eq!(plant.soc, 0.6);
        assert_eq!(plant.capacity_mwh, 50.0);
    }
}
