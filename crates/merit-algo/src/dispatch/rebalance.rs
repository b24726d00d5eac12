//! Iterative rebalancing after the merit-order fill.
//!
//! Each round measures `diff = Σ power − load`. An overshoot is released by
//! the most expensive candidates first, down to their effective minimum; a
//! shortfall is absorbed by the cheapest candidates first, up to their
//! effective maximum. Rounds stop once `|diff|` drops under the convergence
//! threshold, when the iteration cap is hit, or when no candidate has
//! headroom in the needed direction.
//!
//! Under [`FloorPolicy::Aggregate`] nothing happens when the fill already
//! matches the load, even if some candidate sits below its minimum. Under
//! [`FloorPolicy::Strict`] each round first lifts such candidates to their
//! minimum and lets the aggregate correction pay for it.

use merit_core::Megawatts;
use tracing::{debug, trace};

use super::candidate::{total_power, DispatchCandidate};
use super::types::FloorPolicy;

/// Rebalancer settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RebalanceConfig {
    /// Maximum rounds
    pub max_iterations: usize,
    /// Convergence threshold on `|Σ power − load|` (MW)
    pub tolerance: f64,
    pub floor_policy: FloorPolicy,
}

impl Default for RebalanceConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-6,
            floor_policy: FloorPolicy::Aggregate,
        }
    }
}

/// What the rebalancer left behind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RebalanceOutcome {
    pub iterations: usize,
    /// `Σ power − load` after the last round
    pub residual: Megawatts,
}

/// Rebalance `candidates` towards `load`.
///
/// `candidates` must be in merit order, as left by
/// [`allocate`](super::merit_order::allocate).
pub fn rebalance(
    candidates: &mut [DispatchCandidate],
    load: Megawatts,
    config: &RebalanceConfig,
) -> RebalanceOutcome {
    let tolerance = Megawatts(config.tolerance);
    let descending = descending_cost_order(candidates);
    let mut iterations = 0;

    while iterations < config.max_iterations {
        let lifted = match config.floor_policy {
            FloorPolicy::Aggregate => Megawatts::ZERO,
            FloorPolicy::Strict => lift_floors(candidates),
        };

        let diff = total_power(candidates) - load;
        if diff.abs() < tolerance && lifted <= Megawatts::ZERO {
            break;
        }
        iterations += 1;

        let moved = if diff > tolerance {
            release(candidates, &descending, diff, tolerance)
        } else if diff < -tolerance {
            absorb(candidates, -diff, tolerance)
        } else {
            Megawatts::ZERO
        };
        trace!(
            iteration = iterations,
            diff = diff.value(),
            lifted = lifted.value(),
            moved = moved.value(),
            "rebalance round"
        );

        if moved <= Megawatts::ZERO && lifted <= Megawatts::ZERO {
            debug!(
                iteration = iterations,
                diff = diff.value(),
                "no headroom left in the needed direction"
            );
            break;
        }
    }

    let residual = total_power(candidates) - load;
    debug!(iterations, residual = residual.value(), "rebalance finished");
    RebalanceOutcome {
        iterations,
        residual,
    }
}

/// Indices by descending cost; equal costs keep their merit-order position.
fn descending_cost_order(candidates: &[DispatchCandidate]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| candidates[b].cost.total_cmp(&candidates[a].cost));
    order
}

/// Raise every below-floor candidate to its minimum; returns the total added.
fn lift_floors(candidates: &mut [DispatchCandidate]) -> Megawatts {
    let mut lifted = Megawatts::ZERO;
    for candidate in candidates.iter_mut().filter(|c| c.below_floor()) {
        lifted += candidate.min - candidate.power;
        candidate.power = candidate.min;
    }
    lifted
}

fn release(
    candidates: &mut [DispatchCandidate],
    descending: &[usize],
    excess: Megawatts,
    tolerance: Megawatts,
) -> Megawatts {
    let mut remaining = excess;
    for &idx in descending {
        if remaining <= tolerance {
            break;
        }
        let candidate = &mut candidates[idx];
        let step = candidate.releasable().min(remaining);
        if step > Megawatts::ZERO {
            candidate.power -= step;
            remaining -= step;
        }
    }
    excess - remaining
}

fn absorb(
    candidates: &mut [DispatchCandidate],
    shortfall: Megawatts,
    tolerance: Megawatts,
) -> Megawatts {
    let mut remaining = shortfall;
    for candidate in candidates.iter_mut() {
        if remaining <= tolerance {
            break;
        }
        let step = candidate.headroom().min(remaining);
        if step > Megawatts::ZERO {
            candidate.power += step;
            remaining -= step;
        }
    }
    shortfall - remaining
}

#[cfg(test)]
mod tests {
    use super::*;
    use merit_core::{EurosPerMwh, UnitCategory};

    fn candidate(id: &str, cost: f64, min: f64, max: f64, power: f64) -> DispatchCandidate {
        DispatchCandidate {
            id: id.into(),
            category: UnitCategory::ThermalGas,
            efficiency: 1.0,
            min: Megawatts(min),
            max: Megawatts(max),
            cost: EurosPerMwh(cost),
            power: Megawatts(power),
            input_index: 0,
        }
    }

    fn strict() -> RebalanceConfig {
        RebalanceConfig {
            floor_policy: FloorPolicy::Strict,
            ..RebalanceConfig::default()
        }
    }

    #[test]
    fn test_balanced_fill_needs_no_rounds() {
        let mut c = vec![
            candidate("a", 10.0, 0.0, 50.0, 50.0),
            candidate("b", 20.0, 0.0, 50.0, 20.0),
        ];
        let outcome = rebalance(&mut c, Megawatts(70.0), &RebalanceConfig::default());
        assert_eq!(outcome.iterations, 0);
        assert_eq!(outcome.residual, Megawatts::ZERO);
    }

    #[test]
    fn test_overshoot_released_from_most_expensive() {
        let mut c = vec![
            candidate("a", 10.0, 0.0, 50.0, 50.0),
            candidate("b", 20.0, 10.0, 50.0, 30.0),
            candidate("c", 30.0, 5.0, 50.0, 10.0),
        ];
        let outcome = rebalance(&mut c, Megawatts(70.0), &RebalanceConfig::default());
        assert_eq!(outcome.iterations, 1);
        assert_eq!(c[2].power, Megawatts(5.0));
        assert_eq!(c[1].power, Megawatts(15.0));
        assert_eq!(c[0].power, Megawatts(50.0));
        assert!(outcome.residual.abs().value() < 1e-6);
    }

    #[test]
    fn test_shortfall_absorbed_by_cheapest() {
        let mut c = vec![
            candidate("a", 10.0, 0.0, 50.0, 40.0),
            candidate("b", 20.0, 0.0, 50.0, 0.0),
        ];
        let outcome = rebalance(&mut c, Megawatts(60.0), &RebalanceConfig::default());
        assert_eq!(c[0].power, Megawatts(50.0));
        assert_eq!(c[1].power, Megawatts(10.0));
        assert!(outcome.residual.abs().value() < 1e-6);
    }

    #[test]
    fn test_release_ties_follow_merit_order() {
        let mut c = vec![
            candidate("a", 10.0, 0.0, 50.0, 50.0),
            candidate("b1", 20.0, 0.0, 50.0, 20.0),
            candidate("b2", 20.0, 0.0, 50.0, 20.0),
        ];
        rebalance(&mut c, Megawatts(80.0), &RebalanceConfig::default());
        assert_eq!(c[1].power, Megawatts(10.0));
        assert_eq!(c[2].power, Megawatts(20.0));
    }

    #[test]
    fn test_aggregate_policy_leaves_floor_violation() {
        let mut c = vec![
            candidate("a", 10.0, 5.0, 10.0, 10.0),
            candidate("b", 20.0, 30.0, 100.0, 25.0),
        ];
        let outcome = rebalance(&mut c, Megawatts(35.0), &RebalanceConfig::default());
        assert_eq!(outcome.iterations, 0);
        assert_eq!(c[1].power, Megawatts(25.0));
        assert!(c[1].below_floor());
    }

    #[test]
    fn test_strict_policy_lifts_floor() {
        let mut c = vec![
            candidate("a", 10.0, 5.0, 10.0, 10.0),
            candidate("b", 20.0, 30.0, 100.0, 25.0),
        ];
        let outcome = rebalance(&mut c, Megawatts(35.0), &strict());
        assert_eq!(c[0].power, Megawatts(5.0));
        assert_eq!(c[1].power, Megawatts(30.0));
        assert!(outcome.residual.abs().value() < 1e-6);
        assert!(c.iter().all(|c| !c.below_floor()));
    }

    #[test]
    fn test_stalls_without_headroom() {
        // b is pinned at its floor, a is at zero with nothing to give back
        let mut c = vec![
            candidate("a", 10.0, 0.0, 10.0, 0.0),
            candidate("b", 20.0, 30.0, 30.0, 30.0),
        ];
        let outcome = rebalance(&mut c, Megawatts(29.0), &RebalanceConfig::default());
        assert_eq!(outcome.iterations, 1);
        assert_eq!(outcome.residual, Megawatts(1.0));
    }

    #[test]
    fn test_iteration_cap_is_respected() {
        let mut c = vec![
            candidate("a", 10.0, 0.0, 50.0, 10.0),
            candidate("b", 20.0, 0.0, 50.0, 0.0),
        ];
        let config = RebalanceConfig {
            max_iterations: 0,
            ..RebalanceConfig::default()
        };
        let outcome = rebalance(&mut c, Megawatts(60.0), &config);
        assert_eq!(outcome.iterations, 0);
        assert_eq!(outcome.residual, Megawatts(-50.0));
    }
}
