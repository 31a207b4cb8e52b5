use crate::{FdError, FdResult};

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> FdResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(FdError::NonFinite { what, value: v })
    }
}

/// Check that `v` is finite and inside the closed interval `[min, max]`.
pub fn ensure_in_range(v: Real, min: Real, max: Real, what: &'static str) -> FdResult<Real> {
    let v = ensure_finite(v, what)?;
    if v < min || v > max {
        return Err(FdError::OutOfRange {
            what,
            value: v,
            min,
            max,
        });
    }
    Ok(v)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn nearly_equal_is_symmetric(a in -1.0e9_f64..1.0e9_f64, b in -1.0e9_f64..1.0e9_f64) {
            let tol = Tolerances::default();
            prop_assert_eq!(nearly_equal(a, b, tol), nearly_equal(b, a, tol));
        }
    }
}
