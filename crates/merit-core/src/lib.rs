//! # merit-core: Dispatch Data Model
//!
//! Plain data types shared by the dispatch algorithms and the collaborator
//! layers (payload decoding, CLI, HTTP). No algorithms live here.
//!
//! ## Core Data Structures
//!
//! - [`Unit`] - A generating unit with its category, efficiency and declared bounds
//! - [`UnitCategory`] - Closed set of technologies; every derivation matches on it exhaustively
//! - [`MarketState`] - Fuel prices, carbon price and wind availability
//! - [`DispatchRequest`] - Load, units and market for a single computation
//! - [`PlanEntry`] - One unit's planned output
//!
//! ## Units
//!
//! Power is carried as [`Megawatts`] and marginal cost as [`EurosPerMwh`], so a
//! price can never be added to an allocation by accident.
//!
//! ## Quick Start
//!
//! ```rust
//! use merit_core::*;
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
//! assert!(request.validate().is_ok());
//! ```
//!
//! ## Modules
//!
//! - [`diagnostics`] - Soft findings (drift, clamping, floor violations)
//! - [`error`] - Hard request errors and the convergence drift record
//! - [`model`] - Request and plan types
//! - [`units`] - Unit newtypes

pub mod diagnostics;
pub mod error;
pub mod model;
pub mod units;

pub use diagnostics::{Category, DiagnosticIssue, Diagnostics};
pub use error::{ConvergenceDrift, DispatchError, DispatchResult, DriftStage};
pub use model::{
    DispatchRequest, MarketState, PlanEntry, Unit, UnitCategory, DEFAULT_EFFICIENCY,
};
pub use units::{EurosPerMwh, Megawatts};
