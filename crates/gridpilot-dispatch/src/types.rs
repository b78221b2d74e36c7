//! Dispatch planning types.

use gridpilot_core::PlantMeta;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CURTAILMENT_WEIGHT: f64 = 1000.0;
pub const DEFAULT_CYCLE_PENALTY: f64 = 1.0;

/// Inputs to one dispatch solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchProblem {
    /// Forecast solar output in MW, applied to every interval that does not
    /// override it.
    pub mw_forecast: f64,
    pub plant: PlantMeta,
    /// Grid export cap in MW; defaults to 90% of the interval forecast to
    /// model clipping.
    #[serde(default)]
    pub grid_limit_mw: Option<f64>,
    #[serde(default = "default_curtailment_weight")]
    pub curtailment_weight: f64,
    #[serde(default = "default_cycle_penalty")]
    pub cycle_penalty: f64,
    /// Optional explicit horizon; empty means a single interval built from
    /// the fields above.
    #[serde(default)]
    pub intervals: Vec<IntervalSpec>,
}

fn default_curtailment_weight() -> f64 {
    DEFAULT_CURTAILMENT_WEIGHT
}
fn default_cycle_penalty() -> f64 {
    DEFAULT_CYCLE_PENALTY
}

impl DispatchProblem {
    /// Single-interval problem with defaults for everything else.
    pub fn new(mw_forecast: f64, plant: PlantMeta) -> Self {
        Self {
            mw_forecast,
            plant,
            grid_limit_mw: None,
            curtailment_weight: DEFAULT_CURTAILMENT_WEIGHT,
            cycle_penalty: DEFAULT_CYCLE_PENALTY,
            intervals: Vec::new(),
        }
    }
}

/// One interval of an explicit dispatch horizon. Unset fields inherit from
/// the problem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntervalSpec {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub mw_forecast: Option<f64>,
    #[serde(default)]
    pub grid_limit_mw: Option<f64>,
}

/// The plan for a single interval.
#[derive(Debug, Clone, Serialize)]
pub struct IntervalPlan {
    pub interval: usize,
    pub label: String,
    pub mw_forecast: f64,
    pub grid_limit_mw: f64,
    /// Power exported to the grid.
    pub dispatch_mw: f64,
    pub charge_mw: f64,
    pub discharge_mw: f64,
    pub curtailment_mw: f64,
    pub soc_mwh_end: f64,
}

/// A complete dispatch plan. Summary fields mirror the first interval, the
/// way single-interval callers read the result.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchPlan {
    pub dispatch_mw: f64,
    pub charge_mw: f64,
    pub discharge_mw: f64,
    pub curtailment_mw: f64,
    /// Final state of charge in MWh after the last interval.
    pub soc_mwh: f64,
    /// Sample-objective cost of the whole plan.
    pub objective_cost: f64,
    pub intervals: Vec<IntervalPlan>,
}
