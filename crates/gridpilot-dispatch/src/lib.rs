//! Toy dispatch planner for curtailment minimization.
//!
//! A sample formulation, not a production solver: integrators replace this
//! with a real MILP (OR-Tools, Gurobi) once cost curves and efficiency
//! models exist. The plan it produces is the optimum of the sample
//! objective (curtailment weighted far above cycle wear) under grid-export,
//! charge-rate, and state-of-charge limits.

pub mod solver;
pub mod types;

pub use solver::solve;
pub use types::{DispatchPlan, DispatchProblem, IntervalPlan, IntervalSpec};
