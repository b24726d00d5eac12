//! Effective operating bounds after market adjustment.

use merit_core::{DispatchError, DispatchResult, MarketState, Megawatts, Unit, UnitCategory};

/// Operating envelope a candidate is dispatched within
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveBounds {
    pub min: Megawatts,
    pub max: Megawatts,
}

/// Effective bounds of `unit` under `market`.
///
/// Dispatchable units keep their declared bounds. Wind units get
/// `max = pmax × clamp(availability, 0, 100) / 100` and `min = 0`: a
/// variable source never has a dispatchable floor.
pub fn effective_bounds(unit: &Unit, market: &MarketState) -> DispatchResult<EffectiveBounds> {
    match unit.category {
        UnitCategory::VariableWind => {
            let factor = availability_factor(unit, market)?;
            Ok(EffectiveBounds {
                min: Megawatts::ZERO,
                max: unit.pmax * factor,
            })
        }
        UnitCategory::ThermalGas | UnitCategory::ThermalDistillate | UnitCategory::Other => {
            Ok(EffectiveBounds {
                min: unit.pmin,
                max: unit.pmax,
            })
        }
    }
}

/// Clamped availability as a fraction in [0, 1]
fn availability_factor(unit: &Unit, market: &MarketState) -> DispatchResult<f64> {
    market
        .wind_availability_pct
        .filter(|pct| !pct.is_nan())
        .map(|pct| pct.clamp(0.0, 100.0) / 100.0)
        .ok_or_else(|| DispatchError::InvalidAvailabilityFactor {
            unit: unit.id.clone(),
        })
}

/// True when the declared availability had to be clamped
pub fn availability_out_of_range(market: &MarketState) -> bool {
    market
        .wind_availability_pct
        .is_some_and(|pct| !pct.is_nan() && !(0.0..=100.0).contains(&pct))
}
