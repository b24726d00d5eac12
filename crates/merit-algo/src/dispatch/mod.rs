//! Economic dispatch
//!
//! Stages, in the order a request flows through them:
//! - [`cost`]: marginal cost per unit
//! - [`capacity`]: effective bounds per unit
//! - [`merit_order`]: feasibility check and greedy fill
//! - [`rebalance`]: bounded iterative correction
//! - [`rounding`]: 0.1 MW output with residual reconciliation

pub mod candidate;
pub mod capacity;
pub mod cost;
pub mod merit_order;
pub mod rebalance;
pub mod rounding;
mod types;

pub use candidate::DispatchCandidate;
pub use types::{DispatchSolution, FloorPolicy, OutputOrder};

use std::time::Instant;

use merit_core::{
    Category, ConvergenceDrift, Diagnostics, DispatchRequest, DispatchResult, DriftStage,
    Megawatts, PlanEntry,
};
use tracing::{debug, info, warn};

use self::rebalance::RebalanceConfig;

/// Stateless dispatch planner; one instance can serve any number of requests
#[derive(Debug, Clone)]
pub struct DispatchPlanner {
    rebalance: RebalanceConfig,
    acceptance_tolerance: f64,
    output_order: OutputOrder,
}

impl DispatchPlanner {
    /// Create a planner with the default settings
    pub fn new() -> Self {
        Self {
            rebalance: RebalanceConfig::default(),
            acceptance_tolerance: 0.5,
            output_order: OutputOrder::default(),
        }
    }

    pub fn with_floor_policy(mut self, policy: FloorPolicy) -> Self {
        self.rebalance.floor_policy = policy;
        self
    }

    pub fn with_output_order(mut self, order: OutputOrder) -> Self {
        self.output_order = order;
        self
    }

    /// Set maximum rebalancing rounds
    pub fn with_max_iterations(mut self, max_iter: usize) -> Self {
        self.rebalance.max_iterations = max_iter;
        self
    }

    /// Set rebalancing convergence threshold (MW)
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.rebalance.tolerance = tol;
        self
    }

    /// Set the residual (MW) above which drift is reported
    pub fn with_acceptance_tolerance(mut self, tol: f64) -> Self {
        self.acceptance_tolerance = tol;
        self
    }

    pub fn floor_policy(&self) -> FloorPolicy {
        self.rebalance.floor_policy
    }

    pub fn output_order(&self) -> OutputOrder {
        self.output_order
    }

    /// Compute the dispatch plan for `request`.
    ///
    /// Hard errors abort before allocation. Once allocation has started a
    /// plan is always returned; residual mismatches are reported as drift.
    pub fn plan(&self, request: &DispatchRequest) -> DispatchResult<DispatchSolution> {
        let start = Instant::now();
        request.validate()?;

        let load = request.load;
        let mut diagnostics = Diagnostics::new();
        let mut candidates = candidate::build_candidates(request, &mut diagnostics)?;
        let band = merit_order::allocate(&mut candidates, load)?;
        debug!(
            load = load.value(),
            min = band.min.value(),
            max = band.max.value(),
            "load within feasible band"
        );

        let outcome = rebalance::rebalance(&mut candidates, load, &self.rebalance);
        let mut drift = Vec::new();
        if outcome.residual.abs().value() > self.acceptance_tolerance {
            warn!(
                residual = outcome.residual.value(),
                iterations = outcome.iterations,
                "rebalancing did not reach the load"
            );
            diagnostics.add(
                Category::Convergence,
                format!(
                    "planned total misses load by {:.3} MW after {} rounds",
                    outcome.residual.value(),
                    outcome.iterations
                ),
            );
            drift.push(ConvergenceDrift {
                stage: DriftStage::Rebalance,
                residual: outcome.residual,
            });
        }

        for candidate in candidates.iter().filter(|c| c.below_floor()) {
            warn!(
                unit = %candidate.id,
                power = candidate.power.value(),
                min = candidate.min.value(),
                "unit left below its effective minimum"
            );
            diagnostics.add_with_entity(
                Category::Floor,
                format!("power {} below effective minimum {}", candidate.power, candidate.min),
                candidate.id.as_str(),
            );
        }

        let rounded = rounding::reconcile(&candidates, load);
        for &idx in &rounded.out_of_bounds {
            let candidate = &candidates[idx];
            warn!(
                unit = %candidate.id,
                power = rounded.powers[idx].value(),
                "no 0.1 MW step inside the effective bounds"
            );
            diagnostics.add_with_entity(
                Category::Rounding,
                format!(
                    "rounded power {} outside effective bounds [{}, {}]",
                    rounded.powers[idx].value(),
                    candidate.min.value(),
                    candidate.max.value()
                ),
                candidate.id.as_str(),
            );
        }
        if let Some(unresolved) = rounded.unresolved {
            warn!(
                residual = unresolved.value(),
                "rounding residual could not be placed"
            );
            diagnostics.add(
                Category::Rounding,
                format!("{:.1} MW of rounding residual could not be placed", unresolved.value()),
            );
            drift.push(ConvergenceDrift {
                stage: DriftStage::Rounding,
                residual: rounded.total() - load,
            });
        }

        let total_cost: f64 = candidates
            .iter()
            .zip(&rounded.powers)
            .filter(|(_, power)| **power > Megawatts::ZERO)
            .map(|(candidate, power)| *power * candidate.cost)
            .sum();

        let mut entries: Vec<(usize, PlanEntry)> = candidates
            .iter()
            .zip(rounded.powers)
            .map(|(candidate, power)| {
                (
                    candidate.input_index,
                    PlanEntry {
                        id: candidate.id.clone(),
                        power,
                    },
                )
            })
            .collect();
        if self.output_order == OutputOrder::Input {
            entries.sort_by_key(|(input_index, _)| *input_index);
        }

        info!(
            load = load.value(),
            units = entries.len(),
            total_cost,
            iterations = outcome.iterations,
            "production plan computed"
        );

        Ok(DispatchSolution {
            entries: entries.into_iter().map(|(_, entry)| entry).collect(),
            total_cost,
            iterations: outcome.iterations,
            residual: outcome.residual,
            drift,
            diagnostics,
            solve_time_ms: start.elapsed().as_millis(),
        })
    }
}

impl Default for DispatchPlanner {
    fn default() -> Self {
        Self::new()
    }
}
