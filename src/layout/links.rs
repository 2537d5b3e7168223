//! Link resolution: name/id keyed references to index adjacency.
//!
//! Resolution is split into two passes. `resolve` turns every node's own
//! outgoing references into indices; only once all nodes are resolved does
//! `propagate` add the reverse edges. The types enforce that order.

use crate::model::{ModuleId, Node, NodeSource, PendingNode};
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub struct LinkResolver {
    pending: Vec<PendingNode>,
}

/// Nodes whose outgoing links are resolved but not yet symmetrized.
pub struct ResolvedLinks {
    nodes: Vec<Node>,
}

impl LinkResolver {
    pub fn new(pending: Vec<PendingNode>) -> Self {
        Self { pending }
    }

    pub fn resolve(self) -> ResolvedLinks {
        let ids: Vec<ModuleId> = self.pending.iter().map(|p| p.node.id).collect();

        let mut by_name: HashMap<String, usize> = HashMap::new();
        let mut by_id: HashMap<ModuleId, usize> = HashMap::new();
        for (idx, p) in self.pending.iter().enumerate() {
            by_name.insert(p.node.lookup_key(), idx);
            by_id.insert(p.node.id, idx);
        }

        let nodes = self
            .pending
            .into_iter()
            .enumerate()
            .map(|(idx, PendingNode { mut node, source })| {
                // Unknown references and self references are dropped.
                let lookup = |index: Option<&usize>| index.copied().filter(|&j| j != idx);

                let (weight, asynchronous): (Vec<(usize, u32)>, Vec<usize>) = match source {
                    NodeSource::FromReasons {
                        weight,
                        asynchronous,
                    } => (
                        weight
                            .iter()
                            .filter_map(|(name, w)| lookup(by_name.get(name)).map(|j| (j, *w)))
                            .collect(),
                        asynchronous
                            .iter()
                            .filter_map(|name| lookup(by_name.get(name)))
                            .collect(),
                    ),
                    NodeSource::FromSnapshot {
                        weight,
                        asynchronous,
                    } => (
                        weight
                            .iter()
                            .filter_map(|(id, w)| lookup(by_id.get(id)).map(|j| (j, *w)))
                            .collect(),
                        asynchronous
                            .iter()
                            .filter_map(|id| lookup(by_id.get(id)))
                            .collect(),
                    ),
                };

                let mut links_weight = BTreeMap::new();
                let mut links = Vec::with_capacity(weight.len());
                for (j, w) in weight {
                    *links_weight.entry(ids[j]).or_insert(0) += w;
                    if !links.contains(&j) {
                        links.push(j);
                    }
                }

                node.links_weight = links_weight;
                node.links_async = asynchronous.into_iter().map(|j| ids[j]).collect::<BTreeSet<_>>();
                node.links = links;
                node
            })
            .collect();

        ResolvedLinks { nodes }
    }
}

impl ResolvedLinks {
    /// Add missing reverse edges, then derive each node's library index.
    pub fn propagate(mut self) -> Vec<Node> {
        for idx in 0..self.nodes.len() {
            let outgoing = self.nodes[idx].links.clone();
            for j in outgoing {
                if !self.nodes[j].links.contains(&idx) {
                    self.nodes[j].links.push(idx);
                }
            }
        }

        for node in &mut self.nodes {
            node.library_index = library_index(node);
        }

        self.nodes
    }
}

/// Share of undirected links that are the node's own weighted references.
/// Isolated nodes get 0.
fn library_index(node: &Node) -> f64 {
    if node.links.is_empty() {
        0.0
    } else {
        node.links_weight.len() as f64 / node.links.len() as f64
    }
}
