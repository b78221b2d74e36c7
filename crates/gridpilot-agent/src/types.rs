//! Agent answer types.

use gridpilot_dispatch::DispatchPlan;
use gridpilot_forecast::Forecast;
use gridpilot_retrieve::RetrievalHit;
use serde::Serialize;

/// Outcome of one dispatch query.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DispatchAnswer {
    /// Guardrail rejection; the pipeline stages never ran.
    Rejected { message: String },
    /// The composed analysis plus the stage outputs it was built from.
    Answered {
        report: String,
        forecast: Forecast,
        hits: Vec<RetrievalHit>,
        plan: DispatchPlan,
    },
}

impl DispatchAnswer {
    pub fn is_rejected(&self) -> bool {
        matches!(self, DispatchAnswer::Rejected { .. })
    }

    /// The operator-facing text for either outcome.
    pub fn text(&self) -> &str {
        match self {
            DispatchAnswer::Rejected { message } => message,
            DispatchAnswer::Answered { report, .. } => report,
        }
    }
}
