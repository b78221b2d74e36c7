//! Shared application state.

use gridpilot_agent::DispatchAgent;
use gridpilot_core::GridPilotConfig;
use parking_lot::RwLock;
use serde::Serialize;

/// Running totals surfaced by the status endpoint.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct ServeStats {
    pub served: u64,
    pub rejected: u64,
}

/// Shared state accessible from all route handlers.
pub struct AppState {
    pub config: GridPilotConfig,
    pub agent: DispatchAgent,
    pub stats: RwLock<ServeStats>,
}

impl AppState {
    pub fn new(config: GridPilotConfig, agent: DispatchAgent) -> Self {
        Self {
            config,
            agent,
            stats: RwLock::new(ServeStats::default()),
        }
    }

    pub fn record_answer(&self, rejected: bool) {
        let mut stats = self.stats.write();
        stats.served += 1;
        if rejected {
            stats.rejected += 1;
        }
    }
}
