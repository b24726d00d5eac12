//! Merit-order allocation
//!
//! Fills the load from the cheapest candidate upward. All candidates start at
//! zero rather than at their minimum: pre-filling floors can overshoot a load
//! that sits close to the aggregate minimum. Floors are the rebalancer's job.

use merit_core::{DispatchError, DispatchResult, Megawatts};
use tracing::debug;

use super::candidate::DispatchCandidate;

/// Remaining load below which the fill stops
pub const FILL_EPSILON: f64 = 1e-9;

/// Aggregate band of feasible loads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeasibleBand {
    pub min: Megawatts,
    pub max: Megawatts,
}

/// Check `Σ min ≤ load ≤ Σ max` over the candidates.
pub fn feasible_band(candidates: &[DispatchCandidate], load: Megawatts) -> DispatchResult<FeasibleBand> {
    let min: Megawatts = candidates.iter().map(|c| c.min).sum();
    let max: Megawatts = candidates.iter().map(|c| c.max).sum();

    if load < min || load > max {
        return Err(DispatchError::LoadOutOfRange { load, min, max });
    }
    Ok(FeasibleBand { min, max })
}

/// Sort candidates into merit order and fill `load` greedily.
///
/// On return the slice is in ascending cost order; equal-cost candidates
/// keep their input order. Candidates reached after the load ran out stay at
/// zero even if that is below their minimum.
pub fn allocate(candidates: &mut [DispatchCandidate], load: Megawatts) -> DispatchResult<FeasibleBand> {
    let band = feasible_band(candidates, load)?;

    for candidate in candidates.iter_mut() {
        candidate.power = Megawatts::ZERO;
    }

    // `sort_by` is stable, which is what keeps the tie-break deterministic
    candidates.sort_by(|a, b| a.cost.total_cmp(&b.cost));

    let mut remaining = load;
    for candidate in candidates.iter_mut() {
        if remaining.value() <= FILL_EPSILON {
            break;
        }
        let take = remaining.min(candidate.headroom());
        candidate.power += take;
        remaining -= take;
    }

    debug!(
        load = load.value(),
        unserved = remaining.value(),
        "merit-order fill complete"
    );
    Ok(band)
}

#[cfg(test)]
mod tests {
    use super::*;
    use merit_core::{EurosPerMwh, UnitCategory};

    fn candidate(id: &str, cost: f64, min: f64, max: f64, input_index: usize) -> DispatchCandidate {
        DispatchCandidate {
            id: id.into(),
            category: UnitCategory::ThermalGas,
            efficiency: 1.0,
            min: Megawatts(min),
            max: Megawatts(max),
            cost: EurosPerMwh(cost),
            power: Megawatts::ZERO,
            input_index,
        }
    }

    #[test]
    fn test_fills_cheapest_first() {
        let mut c = vec![
            candidate("expensive", 30.0, 0.0, 100.0, 0),
            candidate("cheap", 10.0, 0.0, 50.0, 1),
            candidate("mid", 20.0, 0.0, 50.0, 2),
        ];
        allocate(&mut c, Megawatts(80.0)).unwrap();

        let ids: Vec<_> = c.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["cheap", "mid", "expensive"]);
        assert_eq!(c[0].power, Megawatts(50.0));
        assert_eq!(c[1].power, Megawatts(30.0));
        assert_eq!(c[2].power, Megawatts::ZERO);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let mut c = vec![
            candidate("first", 10.0, 0.0, 40.0, 0),
            candidate("second", 10.0, 0.0, 40.0, 1),
        ];
        allocate(&mut c, Megawatts(50.0)).unwrap();
        assert_eq!(c[0].id, "first");
        assert_eq!(c[0].power, Megawatts(40.0));
        assert_eq!(c[1].power, Megawatts(10.0));
    }

    #[test]
    fn test_starts_from_zero_not_minimum() {
        let mut c = vec![
            candidate("a", 10.0, 5.0, 10.0, 0),
            candidate("b", 20.0, 30.0, 100.0, 1),
        ];
        allocate(&mut c, Megawatts(35.0)).unwrap();
        assert_eq!(c[0].power, Megawatts(10.0));
        assert_eq!(c[1].power, Megawatts(25.0));
    }

    #[test]
    fn test_unpriced_only_when_forced() {
        let mut c = vec![
            candidate("other", f64::INFINITY, 0.0, 100.0, 0),
            candidate("gas", 20.0, 0.0, 50.0, 1),
        ];
        allocate(&mut c, Megawatts(40.0)).unwrap();
        assert_eq!(c[1].id, "other");
        assert_eq!(c[1].power, Megawatts::ZERO);

        allocate(&mut c, Megawatts(70.0)).unwrap();
        assert_eq!(c[1].power, Megawatts(20.0));
    }

    #[test]
    fn test_band_edges_are_accepted() {
        let c = vec![
            candidate("a", 10.0, 5.0, 10.0, 0),
            candidate("b", 20.0, 30.0, 100.0, 1),
        ];
        assert!(feasible_band(&c, Megawatts(35.0)).is_ok());
        assert!(feasible_band(&c, Megawatts(110.0)).is_ok());
    }

    #[test]
    fn test_out_of_band_rejected() {
        let mut c = vec![
            candidate("a", 10.0, 5.0, 10.0, 0),
            candidate("b", 20.0, 30.0, 100.0, 1),
        ];
        let err = allocate(&mut c, Megawatts(34.9)).unwrap_err();
        assert_eq!(
            err,
            DispatchError::LoadOutOfRange {
                load: Megawatts(34.9),
                min: Megawatts(35.0),
                max: Megawatts(110.0),
            }
        );
        assert!(matches!(
            allocate(&mut c, Megawatts(110.1)),
            Err(DispatchError::LoadOutOfRange { .. })
        ));
    }
}
