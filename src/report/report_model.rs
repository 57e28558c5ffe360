use serde::{Deserialize, Serialize};

use crate::scenario::scenario_model::ScenarioResult;

// ============================================================================
// Simulation report: aggregates ScenarioResult instances
// ============================================================================

/// Outcome of a `simulate` run over one or more scenario files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub title: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,

    /// Wall-clock duration in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,

    pub results: Vec<ScenarioResult>,
}

impl SimulationReport {
    pub fn from_results(title: &str, results: Vec<ScenarioResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        Self {
            title: title.to_string(),
            total,
            passed,
            failed: total - passed,
            duration_ms: None,
            results,
        }
    }

    pub fn with_duration(mut self, duration_ms: u128) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}
