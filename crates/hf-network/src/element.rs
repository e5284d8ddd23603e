//! Element variants and their per-element state.

use core::fmt;

use hf_core::{ElementId, Flow, Real, ensure_flow, ensure_limit, ensure_proportions};

use crate::error::{NetworkError, NetworkResult};

/// Type tag identifying an element variant in reports and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementKind {
    Source,
    Tap,
    Split,
    Multisplit,
    Sink,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Source => "Source",
            ElementKind::Tap => "Tap",
            ElementKind::Split => "Split",
            ElementKind::Multisplit => "Multisplit",
            ElementKind::Sink => "Sink",
        }
    }

    /// Whether the variant has an input slot. Only sources do not.
    pub fn has_input(self) -> bool {
        !matches!(self, ElementKind::Source)
    }

    /// Whether the variant may carry a capacity limit.
    pub fn accepts_capacity(self) -> bool {
        self.has_input()
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant-specific configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    /// Production lives in the single output flow slot.
    Source,
    Tap {
        open: bool,
    },
    Split {
        proportions: [Real; 2],
    },
    /// Arity is fixed at construction and equals `proportions.len()`.
    Multisplit {
        proportions: Vec<Real>,
    },
    Sink,
}

impl Variant {
    pub fn kind(&self) -> ElementKind {
        match self {
            Variant::Source => ElementKind::Source,
            Variant::Tap { .. } => ElementKind::Tap,
            Variant::Split { .. } => ElementKind::Split,
            Variant::Multisplit { .. } => ElementKind::Multisplit,
            Variant::Sink => ElementKind::Sink,
        }
    }

    /// Number of output slots.
    pub fn arity(&self) -> usize {
        match self {
            Variant::Source | Variant::Tap { .. } => 1,
            Variant::Split { .. } => 2,
            Variant::Multisplit { proportions } => proportions.len(),
            Variant::Sink => 0,
        }
    }
}

/// One hydraulic element.
///
/// Links to neighbours are handles into the owning network's arena. They are only
/// changed by the network (connect, delete), never by the element itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    variant: Variant,
    max_flow: Option<Real>,
    pub(crate) upstream: Option<ElementId>,
    pub(crate) outputs: Vec<Option<ElementId>>,
    pub(crate) in_flow: Flow,
    pub(crate) out_flows: Vec<Flow>,
    pub(crate) detached: bool,
}

impl Element {
    fn with_variant(name: impl Into<String>, variant: Variant) -> Self {
        let arity = variant.arity();
        Self {
            name: name.into(),
            variant,
            max_flow: None,
            upstream: None,
            outputs: vec![None; arity],
            in_flow: Flow::UNDEFINED,
            out_flows: vec![Flow::UNDEFINED; arity],
            detached: false,
        }
    }

    /// A source with undefined production until `set_production` is called.
    pub fn source(name: impl Into<String>) -> Self {
        Self::with_variant(name, Variant::Source)
    }

    /// A tap, open by default.
    pub fn tap(name: impl Into<String>) -> Self {
        Self::with_variant(name, Variant::Tap { open: true })
    }

    /// A two-way split with an even 0.5/0.5 fan-out.
    pub fn split(name: impl Into<String>) -> Self {
        Self::with_variant(
            name,
            Variant::Split {
                proportions: [0.5, 0.5],
            },
        )
    }

    /// An N-way split with an even 1/N fan-out until proportions are set.
    pub fn multisplit(name: impl Into<String>, outputs: usize) -> NetworkResult<Self> {
        let name = name.into();
        if outputs == 0 {
            return Err(NetworkError::NoOutputSlots { name });
        }
        let share = 1.0 / outputs as Real;
        Ok(Self::with_variant(
            name,
            Variant::Multisplit {
                proportions: vec![share; outputs],
            },
        ))
    }

    pub fn sink(name: impl Into<String>) -> Self {
        Self::with_variant(name, Variant::Sink)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ElementKind {
        self.variant.kind()
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    pub fn arity(&self) -> usize {
        self.outputs.len()
    }

    pub fn upstream(&self) -> Option<ElementId> {
        self.upstream
    }

    /// Output slots in slot order; `None` marks an unconnected (dangling) slot.
    pub fn outputs(&self) -> &[Option<ElementId>] {
        &self.outputs
    }

    /// Downstream element on `slot`, if connected.
    pub fn output(&self, slot: usize) -> Option<ElementId> {
        self.outputs.get(slot).copied().flatten()
    }

    /// Connected downstream elements in slot order.
    pub fn connected_outputs(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.outputs.iter().flatten().copied()
    }

    /// Input flow. Always undefined for a source.
    pub fn in_flow(&self) -> Flow {
        self.in_flow
    }

    /// Output flow on `slot`; undefined for a slot that does not exist.
    pub fn out_flow(&self, slot: usize) -> Flow {
        self.out_flows.get(slot).copied().unwrap_or(Flow::UNDEFINED)
    }

    pub fn out_flows(&self) -> &[Flow] {
        &self.out_flows
    }

    /// Configured capacity limit, `None` meaning unlimited.
    pub fn max_flow(&self) -> Option<Real> {
        self.max_flow
    }

    /// Tap gate state, `None` for other variants.
    pub fn is_open(&self) -> Option<bool> {
        match self.variant {
            Variant::Tap { open } => Some(open),
            _ => None,
        }
    }

    /// Fan-out proportions for Split/Multisplit.
    pub fn proportions(&self) -> Option<&[Real]> {
        match &self.variant {
            Variant::Split { proportions } => Some(proportions.as_slice()),
            Variant::Multisplit { proportions } => Some(proportions.as_slice()),
            _ => None,
        }
    }

    /// Configured production for a source.
    pub fn production(&self) -> Option<Flow> {
        match self.variant {
            Variant::Source => Some(self.out_flow(0)),
            _ => None,
        }
    }

    fn wrong_kind(&self, op: &'static str) -> NetworkError {
        NetworkError::WrongKind {
            name: self.name.clone(),
            kind: self.kind(),
            op,
        }
    }

    /// Set the production rate of a source.
    pub fn set_production(&mut self, production: Real) -> NetworkResult<()> {
        if !matches!(self.variant, Variant::Source) {
            return Err(self.wrong_kind("set_production"));
        }
        let production = ensure_flow(production, "production")?;
        self.out_flows[0] = Flow::new(production);
        Ok(())
    }

    /// Open or close a tap.
    pub fn set_open(&mut self, open: bool) -> NetworkResult<()> {
        match &mut self.variant {
            Variant::Tap { open: state } => {
                *state = open;
                Ok(())
            }
            _ => Err(self.wrong_kind("set_open")),
        }
    }

    /// Replace the fan-out proportions of a split or multisplit.
    ///
    /// Exactly one value per output slot is required. Values are not normalized and
    /// their sum is not checked here; see `Network::proportion_defects`.
    pub fn set_proportions(&mut self, values: &[Real]) -> NetworkResult<()> {
        let expected = self.arity();
        if !matches!(
            self.variant,
            Variant::Split { .. } | Variant::Multisplit { .. }
        ) {
            return Err(self.wrong_kind("set_proportions"));
        }
        if values.len() != expected {
            return Err(NetworkError::ProportionCount {
                name: self.name.clone(),
                expected,
                got: values.len(),
            });
        }
        ensure_proportions(values, "proportion")?;
        match &mut self.variant {
            Variant::Split { proportions } => proportions.copy_from_slice(values),
            Variant::Multisplit { proportions } => proportions.copy_from_slice(values),
            _ => {}
        }
        Ok(())
    }

    /// Attach a capacity limit. `Real::INFINITY` is accepted and means unlimited.
    pub fn set_max_flow(&mut self, max_flow: Real) -> NetworkResult<()> {
        if !self.kind().accepts_capacity() {
            return Err(self.wrong_kind("set_max_flow"));
        }
        self.max_flow = Some(ensure_limit(max_flow, "max_flow")?);
        Ok(())
    }

    pub fn clear_max_flow(&mut self) {
        self.max_flow = None;
    }

    /// Compute output flows from the current input flow.
    ///
    /// Source outputs are configuration and sinks have none, so both are left alone.
    pub(crate) fn compute_outputs(&mut self) {
        let input = self.in_flow;
        match &self.variant {
            Variant::Source | Variant::Sink => {}
            Variant::Tap { open } => {
                self.out_flows[0] = if *open { input } else { Flow::ZERO };
            }
            Variant::Split { proportions } => {
                for (out, &p) in self.out_flows.iter_mut().zip(proportions.iter()) {
                    *out = input.scale(p);
                }
            }
            Variant::Multisplit { proportions } => {
                for (out, &p) in self.out_flows.iter_mut().zip(proportions.iter()) {
                    *out = input.scale(p);
                }
            }
        }
    }

    /// Clear computed flows. Source production is configuration and survives.
    pub(crate) fn reset_flows(&mut self) {
        self.in_flow = Flow::UNDEFINED;
        if !matches!(self.variant, Variant::Source) {
            self.out_flows.fill(Flow::UNDEFINED);
        }
    }
}
