//! The per-interval dispatch pass.

use tracing::debug;

use crate::types::{DispatchPlan, DispatchProblem, IntervalPlan};

/// Plan dispatch over the problem horizon.
///
/// Assumptions, as in the sample formulation:
/// - each interval is one hour, so power and energy are interchangeable;
/// - charge/discharge efficiencies are 100%;
/// - grid export per interval is capped (default 90% of the interval
///   forecast) to model clipping.
///
/// Per interval: export up to the grid cap, charge the surplus up to the
/// charge-rate and remaining-capacity limits, curtail the rest. State of
/// charge carries forward. Charging and discharging are never simultaneous,
/// and under the sample objective discharging only adds cycle wear, so
/// planned discharge is always zero.
pub fn solve(problem: &DispatchProblem) -> DispatchPlan {
    let plant = &problem.plant;
    let capacity_mwh = plant.capacity_mwh.max(0.0);
    let max_charge_mw = plant.max_charge_mw.max(0.0);
    let base_forecast = problem.mw_forecast.max(0.0);

    let mut soc_mwh = plant.soc.clamp(0.0, 1.0) * capacity_mwh;

    // An explicit horizon overrides the single default interval.
    let horizon: Vec<(String, f64, f64)> = if problem.intervals.is_empty() {
        let grid_limit = problem
            .grid_limit_mw
            .unwrap_or(0.9 * base_forecast)
            .max(0.0);
        vec![("t0".to_string(), base_forecast, grid_limit)]
    } else {
        problem
            .intervals
            .iter()
            .enumerate()
            .map(|(idx, spec)| {
                let forecast = spec.mw_forecast.unwrap_or(base_forecast).max(0.0);
                let grid_limit = spec
                    .grid_limit_mw
                    .or(problem.grid_limit_mw)
                    .unwrap_or(0.9 * forecast)
                    .max(0.0);
                let label = spec.label.clone().unwrap_or_else(|| format!("t{}", idx));
                (label, forecast, grid_limit)
            })
            .collect()
    };

    let mut intervals = Vec::with_capacity(horizon.len());
    let mut objective_cost = 0.0;

    for (idx, (label, forecast, grid_limit)) in horizon.into_iter().enumerate() {
        let dispatch_mw = forecast.min(grid_limit);
        let surplus = forecast - dispatch_mw;
        let headroom_mwh = (capacity_mwh - soc_mwh).max(0.0);
        let charge_mw = surplus.min(max_charge_mw).min(headroom_mwh);
        let curtailment_mw = surplus - charge_mw;

        soc_mwh += charge_mw;
        objective_cost +=
            problem.curtailment_weight * curtailment_mw + problem.cycle_penalty * charge_mw;

        debug!(
            interval = idx,
            forecast, dispatch_mw, charge_mw, curtailment_mw, soc_mwh, "Planned interval"
        );

        intervals.push(IntervalPlan {
            interval: idx,
            label,
            mw_forecast: forecast,
            grid_limit_mw: grid_limit,
            dispatch_mw,
            charge_mw,
            discharge_mw: 0.0,
            curtailment_mw,
            soc_mwh_end: soc_mwh,
        });
    }

    let first = &intervals[0];
    DispatchPlan {
        dispatch_mw: first.dispatch_mw,
        charge_mw: first.charge_mw,
        discharge_mw: first.discharge_mw,
        curtailment_mw: first.curtailment_mw,
        soc_mwh,
        objective_cost,
        intervals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IntervalSpec;
    use gridpilot_core::PlantMeta;

    fn plant(soc: f64, capacity: f64, charge_rate: f64) -> PlantMeta {
        PlantMeta {
            soc,
            capacity_mwh: capacity,
            max_charge_mw: charge_rate,
            max_discharge_mw: charge_rate,
        }
    }

    #[test]
    fn test_default_interval_charges_clipped_surplus() {
        let plan = solve(&DispatchProblem::new(42.5, PlantMeta::default()));

        // Default grid limit is 90% of forecast: 38.25 MW exported,
        // 4.25 MW surplus absorbed by the battery, nothing curtailed.
        assert_eq!(plan.dispatch_mw, 38.25);
        assert_eq!(plan.charge_mw, 4.25);
        assert_eq!(plan.curtailment_mw, 0.0);
        assert_eq!(plan.discharge_mw, 0.0);
        assert_eq!(plan.soc_mwh, 0.35 * 50.0 + 4.25);
        assert_eq!(plan.intervals.len(), 1);
        assert_eq!(plan.intervals[0].label, "t0");
    }

    #[test]
    fn test_full_battery_curtails_surplus() {
        let plan = solve(&DispatchProblem::new(40.0, plant(1.0, 10.0, 5.0)));
        assert_eq!(plan.dispatch_mw, 36.0);
        assert_eq!(plan.charge_mw, 0.0);
        assert_eq!(plan.curtailment_mw, 4.0);
    }

    #[test]
    fn test_charge_rate_binds_before_capacity() {
        let plan = solve(&DispatchProblem::new(40.0, plant(0.0, 100.0, 1.5)));
        assert_eq!(plan.charge_mw, 1.5);
        assert_eq!(plan.curtailment_mw, 2.5);
    }

    #[test]
    fn test_explicit_grid_limit() {
        let mut problem = DispatchProblem::new(40.0, plant(0.0, 100.0, 50.0));
        problem.grid_limit_mw = Some(10.0);
        let plan = solve(&problem);
        assert_eq!(plan.dispatch_mw, 10.0);
        assert_eq!(plan.charge_mw, 30.0);
        assert_eq!(plan.curtailment_mw, 0.0);
    }

    #[test]
    fn test_soc_carries_across_intervals() {
        let mut problem = DispatchProblem::new(40.0, plant(0.5, 10.0, 5.0));
        problem.intervals = vec![IntervalSpec::default(), IntervalSpec::default()];
        let plan = solve(&problem);

        // 4 MW surplus per interval; 5 MWh of headroom at the start.
        assert_eq!(plan.intervals[0].charge_mw, 4.0);
        assert_eq!(plan.intervals[0].soc_mwh_end, 9.0);
        assert_eq!(plan.intervals[1].charge_mw, 1.0);
        assert_eq!(plan.intervals[1].curtailment_mw, 3.0);
        assert_eq!(plan.soc_mwh, 10.0);
    }

    #[test]
    fn test_interval_overrides() {
        let mut problem = DispatchProblem::new(40.0, plant(0.0, 100.0, 50.0));
        problem.intervals = vec![
            IntervalSpec {
                label: Some("noon".into()),
                mw_forecast: Some(60.0),
                grid_limit_mw: Some(45.0),
            },
            IntervalSpec::default(),
        ];
        let plan = solve(&problem);
        assert_eq!(plan.intervals[0].label, "noon");
        assert_eq!(plan.intervals[0].dispatch_mw, 45.0);
        assert_eq!(plan.intervals[0].charge_mw, 15.0);
        assert_eq!(plan.intervals[1].label, "t1");
        assert_eq!(plan.intervals[1].mw_forecast, 40.0);
    }

    #[test]
    fn test_inputs_are_clamped() {
        let plan = solve(&DispatchProblem::new(-5.0, plant(1.7, 10.0, 5.0)));
        assert_eq!(plan.dispatch_mw, 0.0);
        assert_eq!(plan.charge_mw, 0.0);
        assert_eq!(plan.curtailment_mw, 0.0);
        // SoC clamps to 1.0 before converting to MWh.
        assert_eq!(plan.soc_mwh, 10.0);
    }

    #[test]
    fn test_objective_cost() {
        let plan = solve(&DispatchProblem::new(40.0, plant(1.0, 10.0, 5.0)));
        // 4 MW curtailed at weight 1000, nothing charged.
        assert_eq!(plan.objective_cost, 4000.0);

        let plan = solve(&DispatchProblem::new(40.0, plant(0.0, 100.0, 50.0)));
        // 4 MW charged at penalty 1.
        assert_eq!(plan.objective_cost, 4.0);
    }
}
