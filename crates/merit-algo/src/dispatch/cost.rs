//! Marginal cost of each unit given the fuel market.
//!
//! | Category | Formula |
//! |----------|---------|
//! | variable-wind | 0 |
//! | thermal-gas | gas / efficiency + 0.3 × carbon |
//! | thermal-distillate | distillate / efficiency |
//! | other | +∞ |

use merit_core::{DispatchError, DispatchResult, EurosPerMwh, MarketState, Unit, UnitCategory};

/// Emission intensity of gas-fired generation (tons CO₂ per MWh)
pub const GAS_EMISSION_INTENSITY: f64 = 0.3;

/// Marginal cost of `unit` under `market`.
///
/// Fails with [`DispatchError::MissingFuelPrice`] when the unit's fuel price is
/// absent or not a finite number. The carbon price is optional for gas units
/// and defaults to zero.
pub fn marginal_cost(unit: &Unit, market: &MarketState) -> DispatchResult<EurosPerMwh> {
    match unit.category {
        UnitCategory::VariableWind => Ok(EurosPerMwh::ZERO),
        UnitCategory::ThermalGas => {
            let gas = required_price(market.gas_price, unit, "gas")?;
            let carbon = match market.carbon_price {
                None => 0.0,
                Some(c) if c.is_finite() => c,
                Some(c) => {
                    return Err(DispatchError::MalformedRequest(format!(
                        "carbon price {} is not a number",
                        c
                    )))
                }
            };
            Ok(EurosPerMwh(
                gas / unit.efficiency() + GAS_EMISSION_INTENSITY * carbon,
            ))
        }
        UnitCategory::ThermalDistillate => {
            let distillate = required_price(market.distillate_price, unit, "distillate")?;
            Ok(EurosPerMwh(distillate / unit.efficiency()))
        }
        UnitCategory::Other => Ok(EurosPerMwh::UNPRICED),
    }
}

fn required_price(
    price: Option<f64>,
    unit: &Unit,
    commodity: &'static str,
) -> DispatchResult<f64> {
    price
        .filter(|p| p.is_finite())
        .ok_or_else(|| DispatchError::MissingFuelPrice {
            unit: unit.id.clone(),
            commodity,
        })
}
