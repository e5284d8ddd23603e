//! Reporting channels between the engine and its callers.
//!
//! Simulation results leave the engine only through these observers. Flow reports and
//! capacity violations are independent channels.

use hf_core::{Flow, Real};

use crate::element::ElementKind;

/// Output flow of a reported element.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutFlow {
    /// Sinks have no output.
    None,
    /// Sources and taps.
    Single(Flow),
    /// Splits and multisplits, in slot order.
    Multiple(Vec<Flow>),
}

impl OutFlow {
    /// Flows as a slice, empty for `OutFlow::None`.
    pub fn as_slice(&self) -> &[Flow] {
        match self {
            OutFlow::None => &[],
            OutFlow::Single(f) => core::slice::from_ref(f),
            OutFlow::Multiple(v) => v.as_slice(),
        }
    }

    /// Sum of all output flows; undefined if any slot is undefined.
    pub fn total(&self) -> Flow {
        Flow::total(self.as_slice().iter().copied())
    }
}

/// One element's flows after a simulation pass.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowReport {
    pub kind: ElementKind,
    pub name: String,
    pub in_flow: Flow,
    pub out_flow: OutFlow,
}

/// An element whose input flow is above its capacity limit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CapacityViolation {
    pub kind: ElementKind,
    pub name: String,
    pub in_flow: Real,
    pub max_flow: Real,
}

/// Receives one report per element per simulation pass.
pub trait FlowObserver {
    fn notify_flow(&mut self, report: &FlowReport);
}

/// Receives one report per element above its capacity limit.
pub trait CapacityObserver {
    fn notify_violation(&mut self, violation: &CapacityViolation);
}

impl<F> FlowObserver for F
where
    F: FnMut(&FlowReport) + ?Sized,
{
    fn notify_flow(&mut self, report: &FlowReport) {
        self(report)
    }
}

impl<F> CapacityObserver for F
where
    F: FnMut(&CapacityViolation) + ?Sized,
{
    fn notify_violation(&mut self, violation: &CapacityViolation) {
        self(violation)
    }
}

/// Observer that keeps every report for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    pub flows: Vec<FlowReport>,
    pub violations: Vec<CapacityViolation>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last flow report for the named element.
    pub fn flow(&self, name: &str) -> Option<&FlowReport> {
        self.flows.iter().rev().find(|r| r.name == name)
    }

    /// Last violation report for the named element.
    pub fn violation(&self, name: &str) -> Option<&CapacityViolation> {
        self.violations.iter().rev().find(|v| v.name == name)
    }

    pub fn clear(&mut self) {
        self.flows.clear();
        self.violations.clear();
    }
}

impl FlowObserver for RecordingObserver {
    fn notify_flow(&mut self, report: &FlowReport) {
        self.flows.push(report.clone());
    }
}

impl CapacityObserver for RecordingObserver {
    fn notify_violation(&mut self, violation: &CapacityViolation) {
        self.violations.push(violation.clone());
    }
}
