use std::fmt;

use merit_core::{ConvergenceDrift, Diagnostics, Megawatts, PlanEntry};
use serde::Serialize;

/// How the rebalancer treats per-unit floors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FloorPolicy {
    /// React only to the aggregate mismatch between planned total and load.
    ///
    /// A merit-order fill that already sums to the load is left untouched,
    /// even if a unit sits below its effective minimum. The violation is
    /// reported as a `floor` diagnostic.
    #[default]
    Aggregate,
    /// Lift every unit below its effective minimum before each round and
    /// keep iterating until no unit is below its floor.
    Strict,
}

impl fmt::Display for FloorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FloorPolicy::Aggregate => write!(f, "aggregate"),
            FloorPolicy::Strict => write!(f, "strict"),
        }
    }
}

impl std::str::FromStr for FloorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aggregate" => Ok(FloorPolicy::Aggregate),
            "strict" => Ok(FloorPolicy::Strict),
            _ => Err(format!("Unknown floor policy: {}", s)),
        }
    }
}

/// Order of entries in the returned plan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputOrder {
    /// Same order as the units in the request
    #[default]
    Input,
    /// Ascending marginal cost, ties in input order
    Merit,
}

impl fmt::Display for OutputOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputOrder::Input => write!(f, "input"),
            OutputOrder::Merit => write!(f, "merit"),
        }
    }
}

impl std::str::FromStr for OutputOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "input" => Ok(OutputOrder::Input),
            "merit" | "cost" => Ok(OutputOrder::Merit),
            _ => Err(format!("Unknown output order: {}", s)),
        }
    }
}

/// Dispatch plan plus everything observed while computing it
#[derive(Debug, Clone, Serialize)]
pub struct DispatchSolution {
    // === Plan ===
    pub entries: Vec<PlanEntry>,
    /// Hourly cost of the rounded plan (€)
    pub total_cost: f64,

    // === Convergence ===
    /// Rebalancing rounds performed
    pub iterations: usize,
    /// Planned total minus load after rebalancing, before rounding
    pub residual: Megawatts,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub drift: Vec<ConvergenceDrift>,
    #[serde(skip_serializing_if = "Diagnostics::is_empty")]
    pub diagnostics: Diagnostics,
    pub solve_time_ms: u128,
}

impl DispatchSolution {
    /// Sum of planned power over all entries
    pub fn total_power(&self) -> Megawatts {
        self.entries.iter().map(|e| e.power).sum()
    }

    pub fn power_of(&self, id: &str) -> Option<Megawatts> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.power)
    }

    /// True when neither stage left drift behind
    pub fn converged(&self) -> bool {
        self.drift.is_empty()
    }
}
