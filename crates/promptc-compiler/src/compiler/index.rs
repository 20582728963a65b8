//! Reverse lookup from destination slots to link sources.

use std::collections::HashMap;

use crate::workflow::{Link, NodeId};

/// Maps `(destination node, destination slot)` to `(source node, source slot)`.
///
/// Built once per compile in one pass over the graph's links. When two links
/// target the same slot, the later one wins.
#[derive(Debug, Clone, Default)]
pub struct LinkIndex {
    sources: HashMap<(NodeId, u32), (NodeId, u32)>,
}

impl LinkIndex {
    /// Builds the index over the given links.
    pub fn build<'a>(links: impl IntoIterator<Item = &'a Link>) -> Self {
        let sources = links
            .into_iter()
            .map(|link| {
                (
                    (link.dst.clone(), link.dst_slot),
                    (link.src.clone(), link.src_slot),
                )
            })
            .collect();
        Self { sources }
    }

    /// Returns the source feeding `slot` of node `dst`.
    pub fn resolve(&self, dst: &NodeId, slot: u32) -> Option<(&NodeId, u32)> {
        self.sources
            .get(&(dst.clone(), slot))
            .map(|(src, src_slot)| (src, *src_slot))
    }

    /// Returns the number of indexed destinations.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns whether no link was indexed.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
