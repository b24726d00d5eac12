//! # merit-algo: Economic Dispatch
//!
//! Computes how much power each generating unit should produce so the total
//! meets a target load at minimum marginal cost, within each unit's
//! operating envelope.
//!
//! ## Pipeline
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Cost model | [`dispatch::cost`] | €/MWh per unit (wind 0, unpriced +∞) |
//! | Capacity adjustment | [`dispatch::capacity`] | effective min/max per unit |
//! | Merit-order fill | [`dispatch::merit_order`] | greedy allocation, cheapest first |
//! | Rebalancing | [`dispatch::rebalance`] | bounded correction towards the load |
//! | Rounding | [`dispatch::rounding`] | 0.1 MW plan summing to the load |
//!
//! Every computation is a pure function of the request: the planner keeps no
//! state between calls and can be shared across threads freely.
//!
//! ## Example
//!
//! ```
//! use merit_algo::{DispatchPlanner, FloorPolicy};
//! use merit_core::{DispatchRequest, MarketState, Megawatts, Unit, UnitCategory};
//!
//! let request = DispatchRequest::new(
//!     100.0,
//!     vec![
//!         Unit::new("wind1", UnitCategory::VariableWind).with_p_limits(0.0, 150.0),
//!         Unit::new("gas1", UnitCategory::ThermalGas)
//!             .with_efficiency(0.5)
//!             .with_p_limits(0.0, 200.0),
//!     ],
//!     MarketState::new().with_gas_price(10.0).with_wind_availability(60.0),
//! );
//!
//! let solution = DispatchPlanner::new()
//!     .with_floor_policy(FloorPolicy::Strict)
//!     .plan(&request)?;
//!
//! assert_eq!(solution.power_of("wind1"), Some(Megawatts(90.0)));
//! assert_eq!(solution.power_of("gas1"), Some(Megawatts(10.0)));
//! # Ok::<(), merit_core::DispatchError>(())
//! ```

pub mod dispatch;

pub use dispatch::{DispatchCandidate, DispatchPlanner, DispatchSolution, FloorPolicy, OutputOrder};
