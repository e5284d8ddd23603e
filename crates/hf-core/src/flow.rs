//! Scalar flow value with an explicit "not yet computed" state.

use core::fmt;

use crate::numeric::{Real, Tolerances, nearly_equal};

/// Rate of throughput at an element or edge.
///
/// A flow is either a defined magnitude or [`Flow::UNDEFINED`], meaning propagation has not
/// reached it yet. Undefined is distinct from zero: a closed tap yields `Flow::ZERO`, an
/// element that was never fed yields `Flow::UNDEFINED`.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Flow(Option<Real>);

impl Flow {
    /// Not reached by propagation.
    pub const UNDEFINED: Flow = Flow(None);

    /// A defined zero flow.
    pub const ZERO: Flow = Flow(Some(0.0));

    /// A defined flow of the given magnitude.
    pub const fn new(value: Real) -> Self {
        Self(Some(value))
    }

    /// The magnitude, or `None` while undefined.
    pub const fn value(self) -> Option<Real> {
        self.0
    }

    pub const fn is_defined(self) -> bool {
        self.0.is_some()
    }

    /// Scale by a proportion. Undefined stays undefined.
    pub fn scale(self, factor: Real) -> Self {
        Self(self.0.map(|v| v * factor))
    }

    /// Tolerance comparison. Two undefined flows are equal; defined vs undefined never is.
    pub fn nearly_eq(self, other: Flow, tol: Tolerances) -> bool {
        match (self.0, other.0) {
            (Some(a), Some(b)) => nearly_equal(a, b, tol),
            (None, None) => true,
            _ => false,
        }
    }

    /// Sum of a set of flows, undefined if any member is undefined.
    pub fn total<I>(flows: I) -> Flow
    where
        I: IntoIterator<Item = Flow>,
    {
        flows
            .into_iter()
            .try_fold(0.0, |acc, f| f.0.map(|v| acc + v))
            .map_or(Flow::UNDEFINED, Flow::new)
    }
}

impl From<Real> for Flow {
    fn from(value: Real) -> Self {
        Flow::new(value)
    }
}

impl From<Option<Real>> for Flow {
    fn from(value: Option<Real>) -> Self {
        Flow(value)
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("undefined"),
        }
    }
}
