//! Scalar checks for flow magnitudes, capacity limits and fan-out proportions.

use crate::HfError;

/// Floating point type used throughout system
pub type Real = f64;

/// Absolute/relative tolerance used when comparing flow totals and proportion sums.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
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
    diff <= tol.abs || diff <= tol.rel * a.abs().max(b.abs())
}

/// A flow magnitude: finite and not negative.
pub fn ensure_flow(v: Real, what: &'static str) -> Result<Real, HfError> {
    if !v.is_finite() {
        return Err(HfError::NonFinite { what, value: v });
    }
    if v < 0.0 {
        return Err(HfError::Negative { what, value: v });
    }
    Ok(v)
}

/// A capacity limit: not negative, `Real::INFINITY` allowed (unlimited).
pub fn ensure_limit(v: Real, what: &'static str) -> Result<Real, HfError> {
    if v.is_nan() {
        return Err(HfError::NonFinite { what, value: v });
    }
    if v < 0.0 {
        return Err(HfError::Negative { what, value: v });
    }
    Ok(v)
}

/// Every fan-out proportion must be finite. Their sum is deliberately not checked here.
pub fn ensure_proportions(values: &[Real], what: &'static str) -> Result<(), HfError> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(&value) => Err(HfError::NonFinite { what, value }),
        None => Ok(()),
    }
}

/// Whether a set of proportions distributes the whole inflow (sums to 1.0).
pub fn proportions_balanced(values: &[Real], tol: Tolerances) -> bool {
    nearly_equal(values.iter().sum(), 1.0, tol)
}
