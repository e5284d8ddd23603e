//! Topology editing: splice an element out and re-wire its neighbours.

use hf_core::ElementId;
use tracing::debug;

use crate::element::ElementKind;
use crate::error::{NetworkError, NetworkResult};
use crate::network::Network;

impl Network {
    /// Remove the named element, connecting its upstream directly to its downstream.
    ///
    /// Sources and sinks are endpoints and cannot be removed. A split or multisplit with
    /// more than one connected output is a branch point and cannot be removed either.
    /// On failure the network is unchanged.
    ///
    /// A removed element with no upstream leaves its downstream unfed; one with no
    /// downstream leaves its upstream's slot unconnected. The stored order of the
    /// remaining elements is preserved, so a topological order stays topological.
    ///
    /// The removed element keeps its arena slot (detached) and its handle is never
    /// reused, so stale handles resolve to `None` rather than to another element.
    pub fn delete_node(&mut self, name: &str) -> NetworkResult<ElementId> {
        let id = self
            .find_by_name(name)
            .ok_or_else(|| NetworkError::NotFound {
                name: name.to_owned(),
            })?;
        let element = &self.arena[id.slot()];

        let kind = element.kind();
        if matches!(kind, ElementKind::Source | ElementKind::Sink) {
            return Err(NetworkError::EndpointNotRemovable {
                name: name.to_owned(),
                kind,
            });
        }

        let connected: Vec<ElementId> = element.connected_outputs().collect();
        if connected.len() > 1 {
            return Err(NetworkError::BranchNotRemovable {
                name: name.to_owned(),
                connected: connected.len(),
            });
        }
        let downstream = connected.first().copied();
        let upstream = element.upstream();

        if let Some(up) = upstream {
            for slot in self.arena[up.slot()].outputs.iter_mut() {
                if *slot == Some(id) {
                    *slot = downstream;
                }
            }
        }
        if let Some(down) = downstream {
            self.arena[down.slot()].upstream = upstream;
        }

        let removed = &mut self.arena[id.slot()];
        removed.upstream = None;
        removed.outputs.fill(None);
        removed.detached = true;
        self.order.retain(|&other| other != id);

        debug!(element = name, ?upstream, ?downstream, "spliced out element");
        Ok(id)
    }
}
