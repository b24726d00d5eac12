//! Presentation rounding to 0.1 MW.
//!
//! Each candidate is rounded to the nearest tenth unless that would cross
//! one of its effective bounds, in which case it is rounded towards the
//! inside of the band. Rounding every candidate independently can still leave
//! the rounded total a tenth or more away from the load. The residual is then
//! placed on the single cheapest candidate that can take it without leaving
//! `[min − 1e-9, max + 1e-9]` or going negative.

use merit_core::Megawatts;
use tracing::debug;

use super::candidate::DispatchCandidate;

/// Residual (MW) at which the rounded total counts as off
pub const ROUNDING_STEP: f64 = 0.1;

/// Slack allowed on effective bounds when placing the residual
pub const BOUND_SLACK: f64 = 1e-9;

/// Rounded powers, aligned with the candidates they came from
#[derive(Debug, Clone, PartialEq)]
pub struct RoundedPlan {
    pub powers: Vec<Megawatts>,
    /// Candidates whose band holds no multiple of 0.1 MW; their rounded
    /// power sits outside the effective bounds
    pub out_of_bounds: Vec<usize>,
    /// `load − Σ rounded` left over when no candidate could take it
    pub unresolved: Option<Megawatts>,
}

impl RoundedPlan {
    pub fn total(&self) -> Megawatts {
        self.powers.iter().sum()
    }
}

fn within(power: Megawatts, candidate: &DispatchCandidate) -> bool {
    let slack = Megawatts(BOUND_SLACK);
    power >= candidate.min - slack && power <= candidate.max + slack
}

/// Nearest tenth, or the nearest tenth inside the band when the raw power
/// is inside it and the nearest one is not.
fn round_within(candidate: &DispatchCandidate) -> Megawatts {
    let nearest = candidate.power.round_tenth();
    if within(nearest, candidate) || !within(candidate.power, candidate) {
        return nearest;
    }
    let tenths = candidate.power.value() * 10.0;
    let inward = if nearest > candidate.max {
        Megawatts(tenths.floor() / 10.0)
    } else {
        Megawatts(tenths.ceil() / 10.0)
    };
    if within(inward, candidate) {
        inward
    } else {
        nearest
    }
}

/// Round every candidate's power and reconcile the total with `load`.
///
/// `candidates` must be in merit order.
pub fn reconcile(candidates: &[DispatchCandidate], load: Megawatts) -> RoundedPlan {
    let mut powers: Vec<Megawatts> = candidates.iter().map(round_within).collect();
    let out_of_bounds: Vec<usize> = candidates
        .iter()
        .zip(&powers)
        .enumerate()
        .filter(|(_, (candidate, power))| {
            within(candidate.power, candidate) && !within(**power, candidate)
        })
        .map(|(idx, _)| idx)
        .collect();

    let rounded_total: Megawatts = powers.iter().sum();
    let difference = (load - rounded_total).round_tenth();
    if difference.abs().value() < ROUNDING_STEP {
        return RoundedPlan {
            powers,
            out_of_bounds,
            unresolved: None,
        };
    }

    let absorbed_by = candidates.iter().enumerate().find_map(|(idx, candidate)| {
        let nudged = powers[idx] + difference;
        (within(nudged, candidate) && nudged >= Megawatts::ZERO).then_some(idx)
    });

    match absorbed_by {
        Some(idx) => {
            powers[idx] = (powers[idx] + difference).round_tenth();
            debug!(
                unit = %candidates[idx].id,
                difference = difference.value(),
                "rounding residual absorbed"
            );
            RoundedPlan {
                powers,
                out_of_bounds,
                unresolved: None,
            }
        }
        None => RoundedPlan {
            powers,
            out_of_bounds,
            unresolved: Some(difference),
        },
    }
}
