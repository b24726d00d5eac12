//! Per-request working set for the dispatch stages.

use merit_core::{
    Category, Diagnostics, DispatchRequest, DispatchResult, EurosPerMwh, Megawatts, UnitCategory,
};
use tracing::debug;

use super::capacity::{availability_out_of_range, effective_bounds};
use super::cost::marginal_cost;

/// Allowed undershoot of an effective minimum before a unit counts as below its floor
pub const FLOOR_TOLERANCE: Megawatts = Megawatts(1e-6);

/// A unit with its derived cost and bounds, plus the power allocated so far.
///
/// Built once per request from the input units and discarded with the
/// response.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchCandidate {
    pub id: String,
    pub category: UnitCategory,
    /// Declared efficiency, or the default
    pub efficiency: f64,
    pub min: Megawatts,
    pub max: Megawatts,
    pub cost: EurosPerMwh,
    pub power: Megawatts,
    /// Position of the unit in the request
    pub input_index: usize,
}

impl DispatchCandidate {
    /// Room left before the effective maximum (never negative)
    #[inline]
    pub fn headroom(&self) -> Megawatts {
        (self.max - self.power).max(Megawatts::ZERO)
    }

    /// Power that can be given back without going under the effective minimum
    #[inline]
    pub fn releasable(&self) -> Megawatts {
        (self.power - self.min).max(Megawatts::ZERO)
    }

    #[inline]
    pub fn below_floor(&self) -> bool {
        self.power < self.min - FLOOR_TOLERANCE
    }
}

/// Derive a candidate for every unit of the request, in input order.
///
/// Any cost or bound failure aborts the whole request.
pub fn build_candidates(
    request: &DispatchRequest,
    diagnostics: &mut Diagnostics,
) -> DispatchResult<Vec<DispatchCandidate>> {
    let mut candidates = Vec::with_capacity(request.units.len());

    for (input_index, unit) in request.units.iter().enumerate() {
        let bounds = effective_bounds(unit, &request.market)?;
        let cost = marginal_cost(unit, &request.market)?;
        let efficiency = unit.efficiency();
        debug!(
            unit = %unit.id,
            category = %unit.category,
            efficiency,
            cost = cost.value(),
            min = bounds.min.value(),
            max = bounds.max.value(),
            "candidate derived"
        );
        candidates.push(DispatchCandidate {
            id: unit.id.clone(),
            category: unit.category,
            efficiency,
            min: bounds.min,
            max: bounds.max,
            cost,
            power: Megawatts::ZERO,
            input_index,
        });
    }

    let has_wind = candidates
        .iter()
        .any(|c| c.category == UnitCategory::VariableWind);
    if has_wind && availability_out_of_range(&request.market) {
        if let Some(pct) = request.market.wind_availability_pct {
            diagnostics.add(
                Category::Market,
                format!("wind availability {} clamped to [0, 100]", pct),
            );
        }
    }

    Ok(candidates)
}

/// Planned total over all candidates
pub fn total_power(candidates: &[DispatchCandidate]) -> Megawatts {
    candidates.iter().map(|c| c.power).sum()
}
