//! Typed dispatch request and plan entries.
//!
//! A [`DispatchRequest`] is built once per request by the collaborator layer
//! and handed to the planner by reference; nothing here is shared between
//! requests.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, DispatchResult};
use crate::units::Megawatts;

/// Efficiency assumed when a unit does not declare one
pub const DEFAULT_EFFICIENCY: f64 = 1.0;

/// Generation technology, which decides the cost formula and bound rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitCategory {
    /// Gas-fired thermal unit (gas price plus carbon)
    ThermalGas,
    /// Distillate-fuel (kerosine) turbine
    ThermalDistillate,
    /// Wind turbine; output scales with availability, no dispatchable floor
    VariableWind,
    /// Anything without a cost formula; dispatched last, only if forced
    Other,
}

impl UnitCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitCategory::ThermalGas => "thermal-gas",
            UnitCategory::ThermalDistillate => "thermal-distillate",
            UnitCategory::VariableWind => "variable-wind",
            UnitCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UnitCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "thermal-gas" => Ok(UnitCategory::ThermalGas),
            "thermal-distillate" => Ok(UnitCategory::ThermalDistillate),
            "variable-wind" => Ok(UnitCategory::VariableWind),
            "other" => Ok(UnitCategory::Other),
            _ => Err(format!("Unknown unit category: {}", s)),
        }
    }
}

/// A generating unit as declared by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub category: UnitCategory,
    /// Fuel-to-power conversion efficiency; `None` means [`DEFAULT_EFFICIENCY`]
    pub efficiency: Option<f64>,
    /// Declared minimum output
    pub pmin: Megawatts,
    /// Declared maximum output
    pub pmax: Megawatts,
}

impl Unit {
    /// Create a unit with zero bounds and default efficiency
    pub fn new(id: impl Into<String>, category: UnitCategory) -> Self {
        Self {
            id: id.into(),
            category,
            efficiency: None,
            pmin: Megawatts::ZERO,
            pmax: Megawatts::ZERO,
        }
    }

    pub fn with_p_limits(mut self, pmin: f64, pmax: f64) -> Self {
        self.pmin = Megawatts(pmin);
        self.pmax = Megawatts(pmax);
        self
    }

    pub fn with_efficiency(mut self, efficiency: f64) -> Self {
        self.efficiency = Some(efficiency);
        self
    }

    /// Declared efficiency, or the default when absent
    #[inline]
    pub fn efficiency(&self) -> f64 {
        self.efficiency.unwrap_or(DEFAULT_EFFICIENCY)
    }

    fn validate(&self) -> DispatchResult<()> {
        if self.id.trim().is_empty() {
            return Err(DispatchError::MalformedRequest(
                "unit with empty identifier".into(),
            ));
        }
        for (label, bound) in [("pmin", self.pmin), ("pmax", self.pmax)] {
            if !bound.is_finite() || bound.value() < 0.0 {
                return Err(DispatchError::MalformedRequest(format!(
                    "unit '{}' has invalid {} {}",
                    self.id,
                    label,
                    bound.value()
                )));
            }
        }
        if self.pmin > self.pmax {
            return Err(DispatchError::MalformedRequest(format!(
                "unit '{}' has pmin {} above pmax {}",
                self.id, self.pmin, self.pmax
            )));
        }
        if let Some(eff) = self.efficiency {
            if !eff.is_finite() || eff <= 0.0 {
                return Err(DispatchError::MalformedRequest(format!(
                    "unit '{}' has non-positive efficiency {}",
                    self.id, eff
                )));
            }
        }
        Ok(())
    }
}

/// Fuel-market prices and weather levels for one request.
///
/// A decoder that saw a present but non-numeric value stores NaN; the cost
/// and capacity stages reject non-finite values the same way as absent ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketState {
    /// Gas price (€/MWh of fuel)
    pub gas_price: Option<f64>,
    /// Distillate (kerosine) price (€/MWh of fuel)
    pub distillate_price: Option<f64>,
    /// Carbon price (€/ton CO₂)
    pub carbon_price: Option<f64>,
    /// Wind availability in percent, clamped to [0, 100] before use
    pub wind_availability_pct: Option<f64>,
}

impl MarketState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gas_price(mut self, price: f64) -> Self {
        self.gas_price = Some(price);
        self
    }

    pub fn with_distillate_price(mut self, price: f64) -> Self {
        self.distillate_price = Some(price);
        self
    }

    pub fn with_carbon_price(mut self, price: f64) -> Self {
        self.carbon_price = Some(price);
        self
    }

    pub fn with_wind_availability(mut self, pct: f64) -> Self {
        self.wind_availability_pct = Some(pct);
        self
    }
}

/// Everything one dispatch computation consumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchRequest {
    /// Target load (MW)
    pub load: Megawatts,
    pub units: Vec<Unit>,
    pub market: MarketState,
}

impl DispatchRequest {
    pub fn new(load: f64, units: Vec<Unit>, market: MarketState) -> Self {
        Self {
            load: Megawatts(load),
            units,
            market,
        }
    }

    /// Structural checks that must pass before any computation.
    ///
    /// Rejects a negative or non-finite load, empty or duplicate unit ids,
    /// negative or inverted bounds, and efficiencies that are not strictly
    /// positive.
    pub fn validate(&self) -> DispatchResult<()> {
        if !self.load.is_finite() || self.load.value() < 0.0 {
            return Err(DispatchError::MalformedRequest(format!(
                "invalid load {}",
                self.load.value()
            )));
        }

        let mut seen = HashSet::with_capacity(self.units.len());
        for unit in &self.units {
            unit.validate()?;
            if !seen.insert(unit.id.as_str()) {
                return Err(DispatchError::MalformedRequest(format!(
                    "duplicate unit identifier '{}'",
                    unit.id
                )));
            }
        }
        Ok(())
    }
}

/// One line of the output plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub id: String,
    /// Planned output, rounded to 0.1 MW
    pub power: Megawatts,
}
