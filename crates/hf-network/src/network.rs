//! The network container: element arena plus stored simulation order.

use std::collections::HashMap;

use hf_core::{ElementId, Real, Tolerances, proportions_balanced};
use tracing::trace;

use crate::element::{Element, ElementKind};
use crate::error::{NetworkError, NetworkResult};

/// A hydraulic network.
///
/// Elements live in an arena indexed by [`ElementId`]; links between elements are
/// handles into that arena. The network is the sole owner of every element.
///
/// The stored order doubles as the simulation order. It is never sorted: callers must
/// add elements upstream-before-downstream. [`Network::check_order`] can verify this.
#[derive(Debug, Clone, Default)]
pub struct Network {
    pub(crate) arena: Vec<Element>,
    pub(crate) order: Vec<ElementId>,
}

/// A split whose proportions do not sum to 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct ProportionDefect {
    pub id: ElementId,
    pub name: String,
    pub sum: Real,
}

impl Network {
    /// Create a new empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element to the stored order and return its handle.
    ///
    /// Names are not checked for uniqueness; lookup returns the first match.
    /// Fails once the arena has used up the `u32` handle space; removed elements keep
    /// their arena slot, so this counts every element ever added.
    pub fn add(&mut self, element: Element) -> NetworkResult<ElementId> {
        let len = self.arena.len();
        let id = u32::try_from(len)
            .ok()
            .and_then(ElementId::try_from_index)
            .ok_or(NetworkError::ArenaFull { len })?;
        trace!(element = element.name(), kind = %element.kind(), %id, "added element");
        self.arena.push(element);
        self.order.push(id);
        Ok(id)
    }

    /// Number of elements currently in the network.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Element handles in stored order.
    pub fn ids(&self) -> &[ElementId] {
        &self.order
    }

    /// Elements in stored order.
    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &Element)> + '_ {
        self.order.iter().map(|&id| (id, &self.arena[id.slot()]))
    }

    /// Get an element by handle. Removed elements are not returned.
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.arena.get(id.slot()).filter(|e| !e.detached)
    }

    /// Mutable access for configuration (production, tap state, proportions, limits).
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.arena.get_mut(id.slot()).filter(|e| !e.detached)
    }

    /// Handle of the first element with the given name, in stored order.
    pub fn find_by_name(&self, name: &str) -> Option<ElementId> {
        self.elements()
            .find(|(_, e)| e.name() == name)
            .map(|(id, _)| id)
    }

    /// First element with the given name.
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.find_by_name(name).and_then(|id| self.get(id))
    }

    pub(crate) fn element(&self, id: ElementId) -> NetworkResult<&Element> {
        self.get(id).ok_or(NetworkError::UnknownElement { id })
    }

    pub(crate) fn element_mut(&mut self, id: ElementId) -> NetworkResult<&mut Element> {
        self.get_mut(id).ok_or(NetworkError::UnknownElement { id })
    }

    /// Connect `to` downstream of `from` on output slot 0.
    pub fn connect(&mut self, from: ElementId, to: ElementId) -> NetworkResult<()> {
        self.connect_at(from, to, 0)
    }

    /// Connect `to` downstream of `from` on the given output slot.
    ///
    /// Sets both the output link on `from` and the upstream back-reference on `to`.
    /// Nothing is mutated when the connection is rejected.
    pub fn connect_at(&mut self, from: ElementId, to: ElementId, slot: usize) -> NetworkResult<()> {
        let upstream = self.element(from)?;
        let downstream = self.element(to)?;

        if from == to {
            return Err(NetworkError::SelfLoop {
                name: upstream.name().to_owned(),
            });
        }
        if slot >= upstream.arity() {
            return Err(NetworkError::SlotOutOfRange {
                name: upstream.name().to_owned(),
                kind: upstream.kind(),
                slot,
                arity: upstream.arity(),
            });
        }
        if upstream.output(slot).is_some() {
            return Err(NetworkError::SlotOccupied {
                name: upstream.name().to_owned(),
                slot,
            });
        }
        if !downstream.kind().has_input() {
            return Err(NetworkError::NoInput {
                name: downstream.name().to_owned(),
            });
        }
        if downstream.upstream().is_some() {
            return Err(NetworkError::AlreadyConnected {
                name: downstream.name().to_owned(),
            });
        }

        trace!(from = upstream.name(), to = downstream.name(), slot, "connected");
        self.arena[from.slot()].outputs[slot] = Some(to);
        self.arena[to.slot()].upstream = Some(from);
        Ok(())
    }

    pub fn set_production(&mut self, id: ElementId, production: Real) -> NetworkResult<()> {
        self.element_mut(id)?.set_production(production)
    }

    pub fn set_open(&mut self, id: ElementId, open: bool) -> NetworkResult<()> {
        self.element_mut(id)?.set_open(open)
    }

    pub fn set_proportions(&mut self, id: ElementId, values: &[Real]) -> NetworkResult<()> {
        self.element_mut(id)?.set_proportions(values)
    }

    pub fn set_max_flow(&mut self, id: ElementId, max_flow: Real) -> NetworkResult<()> {
        self.element_mut(id)?.set_max_flow(max_flow)
    }

    /// Forget all computed flows. Source production is kept.
    pub fn reset_flows(&mut self) {
        for &id in &self.order {
            self.arena[id.slot()].reset_flows();
        }
    }

    /// Verify the stored order is topological: every element after its upstream.
    ///
    /// Simulation never calls this; it is available to callers who want the guarantee.
    pub fn check_order(&self) -> NetworkResult<()> {
        let position: HashMap<ElementId, usize> = self
            .order
            .iter()
            .enumerate()
            .map(|(pos, &id)| (id, pos))
            .collect();

        for (pos, &id) in self.order.iter().enumerate() {
            let element = &self.arena[id.slot()];
            let Some(up) = element.upstream() else {
                continue;
            };
            let up_pos = position.get(&up).copied().unwrap_or(usize::MAX);
            if up_pos > pos {
                return Err(NetworkError::OutOfOrder {
                    name: element.name().to_owned(),
                    upstream: self.arena[up.slot()].name().to_owned(),
                });
            }
        }
        Ok(())
    }

    /// Splits and multisplits whose proportions do not sum to 1.0 within `tol`.
    pub fn proportion_defects(&self, tol: Tolerances) -> Vec<ProportionDefect> {
        self.elements()
            .filter_map(|(id, e)| {
                let proportions = e.proportions()?;
                (!proportions_balanced(proportions, tol)).then(|| ProportionDefect {
                    id,
                    name: e.name().to_owned(),
                    sum: proportions.iter().sum(),
                })
            })
            .collect()
    }

    /// Elements of a given kind, in stored order.
    pub fn of_kind(&self, kind: ElementKind) -> impl Iterator<Item = (ElementId, &Element)> + '_ {
        self.elements().filter(move |(_, e)| e.kind() == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> (Network, ElementId, ElementId, ElementId) {
        let mut net = Network::new();
        let src = net.add(Element::source("src")).unwrap();
        let tap = net.add(Element::tap("tap")).unwrap();
        let sink = net.add(Element::sink("sink")).unwrap();
        net.connect(src, tap).unwrap();
        net.connect(tap, sink).unwrap();
        (net, src, tap, sink)
    }

    #[test]
    fn connect_sets_both_links() {
        let (net, src, tap, sink) = chain();
        assert_eq!(net.get(src).unwrap().output(0), Some(tap));
        assert_eq!(net.get(tap).unwrap().upstream(), Some(src));
        assert_eq!(net.get(tap).unwrap().output(0), Some(sink));
        assert_eq!(net.get(sink).unwrap().upstream(), Some(tap));
        assert!(net.get(src).unwrap().upstream().is_none());
    }

    #[test]
    fn source_accepts_only_one_output() {
        let (mut net, src, _, _) = chain();
        let other = net.add(Element::sink("other")).unwrap();
        let err = net.connect(src, other).unwrap_err();
        assert!(matches!(err, NetworkError::SlotOccupied { slot: 0, .. }));
        let err = net.connect_at(src, other, 1).unwrap_err();
        assert!(matches!(err, NetworkError::SlotOutOfRange { arity: 1, .. }));
        assert!(net.get(other).unwrap().upstream().is_none());
    }

    #[test]
    fn sink_has_no_outputs() {
        let (mut net, _, _, sink) = chain();
        let other = net.add(Element::sink("other")).unwrap();
        let err = net.connect(sink, other).unwrap_err();
        assert!(matches!(err, NetworkError::SlotOutOfRange { arity: 0, .. }));
    }

    #[test]
    fn cannot_feed_a_source() {
        let mut net = Network::new();
        let a = net.add(Element::tap("a")).unwrap();
        let src = net.add(Element::source("src")).unwrap();
        let err = net.connect(a, src).unwrap_err();
        assert!(matches!(err, NetworkError::NoInput { .. }));
    }

    #[test]
    fn second_upstream_rejected() {
        let mut net = Network::new();
        let s1 = net.add(Element::source("s1")).unwrap();
        let s2 = net.add(Element::source("s2")).unwrap();
        let sink = net.add(Element::sink("k")).unwrap();
        net.connect(s1, sink).unwrap();
        let err = net.connect(s2, sink).unwrap_err();
        assert!(matches!(err, NetworkError::AlreadyConnected { .. }));
        assert_eq!(net.get(s2).unwrap().output(0), None);
    }

    #[test]
    fn self_loop_rejected() {
        let mut net = Network::new();
        let t = net.add(Element::tap("t")).unwrap();
        assert!(matches!(
            net.connect(t, t),
            Err(NetworkError::SelfLoop { .. })
        ));
    }

    #[test]
    fn unknown_handle_rejected() {
        let mut net = Network::new();
        let t = net.add(Element::tap("t")).unwrap();
        let ghost = ElementId::try_from_index(42).unwrap();
        assert_eq!(
            net.connect(t, ghost),
            Err(NetworkError::UnknownElement { id: ghost })
        );
        assert!(net.set_open(ghost, false).is_err());
    }

    #[test]
    fn handles_stay_unique_after_delete() {
        let (mut net, src, tap, sink) = chain();
        net.delete_node("tap").unwrap();
        let fresh = net.add(Element::tap("fresh")).unwrap();
        assert_ne!(fresh, tap);
        assert!(![src, sink].contains(&fresh));
        assert_eq!(fresh.index(), 3);
        assert!(net.get(tap).is_none());
        assert_eq!(net.get(fresh).unwrap().name(), "fresh");
    }

    #[test]
    fn find_returns_first_match() {
        let mut net = Network::new();
        let first = net.add(Element::tap("dup")).unwrap();
        let _second = net.add(Element::sink("dup")).unwrap();
        assert_eq!(net.find_by_name("dup"), Some(first));
        assert_eq!(net.find("dup").unwrap().kind(), ElementKind::Tap);
        assert!(net.find("missing").is_none());
        assert_eq!(net.len(), 2);
    }

    #[test]
    fn check_order_detects_reversed_insert() {
        let (net, ..) = chain();
        assert!(net.check_order().is_ok());

        let mut net = Network::new();
        let sink = net.add(Element::sink("sink")).unwrap();
        let src = net.add(Element::source("src")).unwrap();
        net.connect(src, sink).unwrap();
        assert_eq!(
            net.check_order(),
            Err(NetworkError::OutOfOrder {
                name: "sink".into(),
                upstream: "src".into()
            })
        );
    }

    #[test]
    fn proportion_defects_lists_skewed_splits() {
        let mut net = Network::new();
        let ok = net.add(Element::split("ok")).unwrap();
        let bad = net.add(Element::multisplit("bad", 3).unwrap()).unwrap();
        net.set_proportions(ok, &[0.3, 0.7]).unwrap();
        net.set_proportions(bad, &[0.3, 0.3, 0.3]).unwrap();
        let defects = net.proportion_defects(Tolerances::default());
        assert_eq!(defects.len(), 1);
        assert_eq!(defects[0].id, bad);
        assert!((defects[0].sum - 0.9).abs() < 1e-12);
    }

    #[test]
    fn of_kind_filters() {
        let (net, src, ..) = chain();
        let sources: Vec<_> = net.of_kind(ElementKind::Source).map(|(id, _)| id).collect();
        assert_eq!(sources, vec![src]);
    }
}
