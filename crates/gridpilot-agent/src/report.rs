//! Report composition.
//!
//! Sections always appear in the same order: forecast, grounded insights,
//! dispatch plan, recommendation. Downstream consumers (and the tests) rely
//! on that ordering.

use gridpilot_dispatch::DispatchPlan;
use gridpilot_forecast::Forecast;
use gridpilot_retrieve::RetrievalHit;

pub const REPORT_HEADER: &str = "=== DISPATCH ANALYSIS ===";

/// Compose the operator-facing report from the three stage outputs.
pub fn compose(
    query: &str,
    forecast: &Forecast,
    hits: &[RetrievalHit],
    plan: &DispatchPlan,
    recommendation: &str,
) -> String {
    let mut out = String::new();

    out.push_str(REPORT_HEADER);
    out.push_str("\n\nUser Query:\n");
    out.push_str(query);

    out.push_str("\n\nSolar Forecast:\n");
    out.push_str(&format!(" - MW: {:.2}\n", forecast.mw));
    out.push_str(&format!(" - Confidence: {:.2}\n", forecast.confidence));
    if let Some(note) = &forecast.note {
        out.push_str(&format!(" - Note: {}\n", note));
    }

    out.push_str("\nGrounded Insights:\n");
    if hits.is_empty() {
        out.push_str(" (no matching snippets in the knowledge base)\n");
    }
    for hit in hits {
        out.push_str(&format!(
            " [{}] {} (score {:.2}):\n {}\n",
            hit.rank, hit.source, hit.score, hit.text
        ));
    }

    out.push_str("\nOptimized Dispatch:\n");
    out.push_str(&format!(" - Dispatch MW: {:.2}\n", plan.dispatch_mw));
    out.push_str(&format!(" - Charge MW: {:.2}\n", plan.charge_mw));
    out.push_str(&format!(" - Discharge MW: {:.2}\n", plan.discharge_mw));
    out.push_str(&format!(" - Curtailment MW: {:.2}\n", plan.curtailment_mw));
    out.push_str(&format!(" - Ending SoC MWh: {:.2}\n", plan.soc_mwh));
    if plan.intervals.len() > 1 {
        out.push_str(&format!(" - Intervals planned: {}\n", plan.intervals.len()));
    }

    out.push_str("\nFinal Recommendation:\n");
    out.push_str(recommendation);
    out.push('\n');

    out
}

/// Canned recommendation for offline mode.
pub fn offline_recommendation() -> String {
    "Combine the forecast, the grounded engineering insights, and the dispatch \
     plan above to minimize curtailment and protect battery life. (No LLM \
     provider configured; set an API key for a narrative recommendation.)"
        .to_string()
}
