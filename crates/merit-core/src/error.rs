//! Error taxonomy for dispatch requests
//!
//! Every variant of [`DispatchError`] is fatal for the request it was raised
//! on: no partial plan is ever returned alongside it. Soft findings such as
//! convergence drift are carried on the solution instead (see
//! [`ConvergenceDrift`]).
//!
//! # Example
//!
//! ```
//! use merit_core::{DispatchError, DispatchResult, Megawatts};
//!
//! fn check(load: Megawatts) -> DispatchResult<()> {
//!     if load.value() < 0.0 {
//!         return Err(DispatchError::MalformedRequest("negative load".into()));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check(Megawatts(-1.0)).is_err());
//! ```

use serde::Serialize;
use thiserror::Error;

use crate::units::Megawatts;

/// Hard failures of a dispatch request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// Required fields absent or structurally invalid
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// A dispatchable unit needs a market price that was not supplied
    #[error("missing {commodity} price required by unit '{unit}'")]
    MissingFuelPrice { unit: String, commodity: &'static str },

    /// Wind availability missing or not a number
    #[error("invalid or missing wind availability required by unit '{unit}'")]
    InvalidAvailabilityFactor { unit: String },

    /// Requested load outside the aggregate feasible band
    #[error(
        "requested load {} MW is outside the feasible range [{}, {}] MW",
        .load.value(),
        .min.value(),
        .max.value()
    )]
    LoadOutOfRange {
        load: Megawatts,
        min: Megawatts,
        max: Megawatts,
    },
}

/// Convenience type alias for Results using DispatchError.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Stage that left a residual behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftStage {
    Rebalance,
    Rounding,
}

impl std::fmt::Display for DriftStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriftStage::Rebalance => write!(f, "rebalance"),
            DriftStage::Rounding => write!(f, "rounding"),
        }
    }
}

/// Non-fatal mismatch between planned total and requested load.
///
/// `residual` is signed: planned total minus load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConvergenceDrift {
    pub stage: DriftStage,
    pub residual: Megawatts,
}

impl std::fmt::Display for ConvergenceDrift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} stage left {:.3} MW unmatched",
            self.stage,
            self.residual.value()
        )
    }
}
