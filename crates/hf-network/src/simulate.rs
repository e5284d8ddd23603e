//! Flow propagation and capacity validation passes.

use hf_core::{ElementId, Flow};
use tracing::{debug, trace, warn};

use crate::element::Variant;
use crate::network::Network;
use crate::observer::{CapacityObserver, CapacityViolation, FlowObserver, FlowReport, OutFlow};

/// Options for a combined simulate/validate run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationOptions {
    /// Run capacity validation after propagation.
    pub check_capacity: bool,
}

impl SimulationOptions {
    pub fn with_capacity_check(mut self) -> Self {
        self.check_capacity = true;
        self
    }
}

/// Counters from one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Flow reports emitted.
    pub reported: usize,
    /// Non-source elements reported with an undefined input flow.
    pub undefined: usize,
    /// Capacity violations emitted (zero when validation was not requested).
    pub violations: usize,
}

impl Network {
    /// Propagate flows through the network in stored order.
    ///
    /// Every pass starts from scratch: computed flows of all non-source elements are
    /// cleared first, so results never depend on an earlier pass.
    ///
    /// Each element computes its outputs from its current input and immediately pushes
    /// them into its downstream neighbours, so an element must be stored after its
    /// upstream. An element reached out of order reads an undefined input and passes
    /// it on; this is reported as-is rather than treated as an error. Unconnected output
    /// slots simply drop their flow.
    pub fn simulate<O>(&mut self, observer: &mut O) -> PassSummary
    where
        O: FlowObserver + ?Sized,
    {
        let mut summary = PassSummary::default();
        self.reset_flows();

        for pos in 0..self.order.len() {
            let id = self.order[pos];
            self.propagate(id);

            let report = self.report(id);
            if report.kind.has_input() && !report.in_flow.is_defined() {
                summary.undefined += 1;
            }
            trace!(element = %report.name, kind = %report.kind, in_flow = %report.in_flow, "propagated");
            observer.notify_flow(&report);
            summary.reported += 1;
        }

        if summary.undefined > 0 {
            warn!(
                undefined = summary.undefined,
                "elements reached with undefined inflow; check insertion order and dangling inputs"
            );
        }
        debug!(reported = summary.reported, "simulation pass complete");
        summary
    }

    /// Report every element whose input flow exceeds its capacity limit.
    ///
    /// Flows are read, never written. Sources carry no limit and are skipped.
    pub fn validate_capacity<O>(&self, observer: &mut O) -> usize
    where
        O: CapacityObserver + ?Sized,
    {
        let mut violations = 0;
        for (_, element) in self.elements() {
            let (Some(in_flow), Some(max_flow)) = (element.in_flow().value(), element.max_flow())
            else {
                continue;
            };
            if in_flow <= max_flow {
                continue;
            }
            observer.notify_violation(&CapacityViolation {
                kind: element.kind(),
                name: element.name().to_owned(),
                in_flow,
                max_flow,
            });
            violations += 1;
        }
        debug!(violations, "capacity validation complete");
        violations
    }

    /// Simulate, then validate capacity when the options ask for it.
    pub fn run<F, C>(
        &mut self,
        options: SimulationOptions,
        flows: &mut F,
        violations: &mut C,
    ) -> PassSummary
    where
        F: FlowObserver + ?Sized,
        C: CapacityObserver + ?Sized,
    {
        let mut summary = self.simulate(flows);
        if options.check_capacity {
            summary.violations = self.validate_capacity(violations);
        }
        summary
    }

    fn propagate(&mut self, id: ElementId) {
        let element = &mut self.arena[id.slot()];
        element.compute_outputs();

        let pushes: Vec<(ElementId, Flow)> = element
            .outputs
            .iter()
            .zip(element.out_flows.iter())
            .filter_map(|(slot, &flow)| slot.map(|next| (next, flow)))
            .collect();

        for (next, flow) in pushes {
            self.arena[next.slot()].in_flow = flow;
        }
    }

    fn report(&self, id: ElementId) -> FlowReport {
        let element = &self.arena[id.slot()];
        let out_flow = match element.variant() {
            Variant::Sink => OutFlow::None,
            Variant::Source | Variant::Tap { .. } => OutFlow::Single(element.out_flow(0)),
            Variant::Split { .. } | Variant::Multisplit { .. } => {
                OutFlow::Multiple(element.out_flows().to_vec())
            }
        };
        FlowReport {
            kind: element.kind(),
            name: element.name().to_owned(),
            in_flow: element.in_flow(),
            out_flow,
        }
    }
}
