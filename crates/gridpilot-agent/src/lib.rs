//! The dispatch agent — chains the guardrail, forecast, retrieval, and
//! dispatch stages into one operator-facing answer.

pub mod orchestrator;
pub mod report;
pub mod types;

pub use orchestrator::DispatchAgent;
pub use types::DispatchAnswer;
