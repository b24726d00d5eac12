//! Plan and error bodies.

use merit_core::PlanEntry;
use serde::{Deserialize, Serialize};

/// One `{"name", "power"}` line of a plan response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanLine {
    pub name: String,
    pub power: f64,
}

impl From<&PlanEntry> for PlanLine {
    fn from(entry: &PlanEntry) -> Self {
        Self {
            name: entry.id.clone(),
            power: entry.power.value(),
        }
    }
}

/// `{"error": "..."}` body returned for rejected requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(err: &impl std::fmt::Display) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

/// Plan lines in the order the entries were given
pub fn plan_lines(entries: &[PlanEntry]) -> Vec<PlanLine> {
    entries.iter().map(PlanLine::from).collect()
}

/// Encode a plan as a pretty-printed JSON array
pub fn encode_plan(entries: &[PlanEntry]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&plan_lines(entries))
}
