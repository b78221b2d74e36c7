//! Naive trend projection over historical output.

use crate::types::FeatureRow;

/// Project solar output for `future` rows from the trend in `history`.
///
/// The slope is the average step between the first and last historical
/// outputs, applied cumulatively from the last observation. With history
/// ending 32.0, 38.5, 41.0 the slope is 4.5 and two future rows project
/// 45.5 then 50.0. Fewer than two historical outputs flatten the trend.
pub fn naive_projection(history: &[FeatureRow], future: &[FeatureRow]) -> Vec<FeatureRow> {
    let outputs: Vec<f64> = history
        .iter()
        .filter_map(|row| row.target_solar_output)
        .collect();

    let (last, slope) = match outputs.as_slice() {
        [] => (0.0, 0.0),
        [only] => (*only, 0.0),
        [first, .., last] => (*last, (last - first) / (outputs.len() - 1) as f64),
    };

    future
        .iter()
        .enumerate()
        .map(|(step, row)| {
            let projected = last + slope * (step + 1) as f64;
            FeatureRow {
                target_solar_output: Some(projected.max(0.0)),
                ..row.clone()
            }
        })
        .collect()
}
