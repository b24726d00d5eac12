//! Compile-time unit safety for dispatch quantities.
//!
//! Prevents mixing power with prices, e.g. adding a marginal cost to an
//! allocation. Both types are `#[repr(transparent)]` over `f64`.
//!
//! # Usage
//!
//! ```
//! use merit_core::units::{EurosPerMwh, Megawatts};
//!
//! let p = Megawatts(90.0);
//! let total = p + Megawatts(10.0);
//! assert_eq!(total.value(), 100.0);
//!
//! // Hourly cost of running at `total`
//! let price = EurosPerMwh(20.0);
//! assert_eq!(total * price, 2000.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Macro to implement common arithmetic operations for unit types
macro_rules! impl_unit_ops {
    ($type:ty, $unit_name:literal) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl AddAssign for $type {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl SubAssign for $type {
            fn sub_assign(&mut self, rhs: Self) {
                self.0 -= rhs.0;
            }
        }

        impl Neg for $type {
            type Output = Self;
            fn neg(self) -> Self::Output {
                Self(-self.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:.1} {}", self.0, $unit_name)
            }
        }

        impl $type {
            /// Create a new value
            #[inline]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Get the raw numeric value
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }

            /// Absolute value
            #[inline]
            pub fn abs(self) -> Self {
                Self(self.0.abs())
            }

            /// Check if value is finite
            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            /// Minimum of two values
            #[inline]
            pub fn min(self, other: Self) -> Self {
                Self(self.0.min(other.0))
            }

            /// Maximum of two values
            #[inline]
            pub fn max(self, other: Self) -> Self {
                Self(self.0.max(other.0))
            }
        }

        impl std::iter::Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }

        impl<'a> std::iter::Sum<&'a $type> for $type {
            fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }
    };
}

// =============================================================================
// Power
// =============================================================================

/// Active power in megawatts (MW)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Megawatts(pub f64);

impl_unit_ops!(Megawatts, "MW");

impl Megawatts {
    pub const ZERO: Megawatts = Megawatts(0.0);

    /// Round to one decimal place (0.1 MW), half away from zero.
    #[inline]
    pub fn round_tenth(self) -> Self {
        Self((self.0 * 10.0).round() / 10.0)
    }
}

// =============================================================================
// Price
// =============================================================================

/// Marginal cost in euros per megawatt-hour (€/MWh)
///
/// May be `+inf` for units without a cost formula; those sort last in the
/// merit order.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct EurosPerMwh(pub f64);

impl_unit_ops!(EurosPerMwh, "€/MWh");

impl EurosPerMwh {
    pub const ZERO: EurosPerMwh = EurosPerMwh(0.0);
    pub const UNPRICED: EurosPerMwh = EurosPerMwh(f64::INFINITY);

    /// Total order over prices, `+inf` included.
    #[inline]
    pub fn total_cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Running `p` for one hour at price `c` costs `p * c` euros.
impl Mul<EurosPerMwh> for Megawatts {
    type Output = f64;
    fn mul(self, rhs: EurosPerMwh) -> Self::Output {
        self.0 * rhs.0
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_megawatts_arithmetic() {
        let p1 = Megawatts(100.0);
        let p2 = Megawatts(50.0);

        assert_eq!((p1 + p2).value(), 150.0);
        assert_eq!((p1 - p2).value(), 50.0);
        assert_eq!((-p1).value(), -100.0);
        assert_eq!((p1 * 0.6).value(), 60.0);
        assert_eq!((p1 / 2.0).value(), 50.0);

        let mut p = Megawatts(10.0);
        p += Megawatts(5.0);
        p -= Megawatts(2.5);
        assert_eq!(p.value(), 12.5);
    }

    #[test]
    fn test_round_tenth() {
        assert_eq!(Megawatts(89.94).round_tenth().value(), 89.9);
        assert_eq!(Megawatts(89.96).round_tenth().value(), 90.0);
        assert_eq!(Megawatts(0.05).round_tenth().value(), 0.1);
        assert_eq!(Megawatts(-0.05).round_tenth().value(), -0.1);
    }

    #[test]
    fn test_unpriced_sorts_last() {
        let mut prices = vec![
            EurosPerMwh::UNPRICED,
            EurosPerMwh(20.0),
            EurosPerMwh::ZERO,
        ];
        prices.sort_by(EurosPerMwh::total_cmp);
        assert_eq!(prices[0], EurosPerMwh::ZERO);
        assert_eq!(prices[2], EurosPerMwh::UNPRICED);
    }

    #[test]
    fn test_hourly_cost() {
        assert_eq!(Megawatts(10.0) * EurosPerMwh(25.0), 250.0);
    }

    #[test]
    fn test_sum_iterator() {
        let powers = vec![Megawatts(10.0), Megawatts(20.0), Megawatts(30.0)];
        let total: Megawatts = powers.iter().sum();

        assert_eq!(total.value(), 60.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Megawatts(90.0)), "90.0 MW");
        assert_eq!(format!("{}", EurosPerMwh(25.0)), "25.0 €/MWh");
    }
}
