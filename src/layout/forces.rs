//! Position-independent force multipliers, computed once per graph.

use super::physics::Physics;
use crate::model::Node;

/// Attraction bias of the link `a -> b`, squared.
///
/// Blends a harmonic "connection index" of both library indices (weighted by
/// dependency direction) with a fan-out normalized library term.
pub fn strongness(a: &Node, b: &Node, physics: &Physics) -> f64 {
    let connection_index = if a.depends_on(b) {
        2.0 / (1.0 / a.library_index + b.library_index)
    } else {
        2.0 / (a.library_index + 1.0 / b.library_index)
    };
    let library_index = 1.0
        / (a.library_index * (a.links.len() as f64).sqrt())
            .max(b.library_index * (b.links.len() as f64).sqrt());
    let weight = physics.weight_library_index;
    let value = (connection_index + library_index * weight) / (1.0 + weight);
    value * value
}

/// Repulsion bias between `a` and `b`, independent of their distance.
pub fn detraction(a: &Node, b: &Node, physics: &Physics) -> f64 {
    let connections = hub_bonus(a) + hub_bonus(b) + 1.0;
    let extra = if a.files != b.files {
        physics.extra_detraction_files
    } else {
        0.0
    };
    connections.sqrt() + extra
}

fn hub_bonus(node: &Node) -> f64 {
    (1.0 / (node.library_index + 1.0)).max(node.library_index)
}

/// Precomputed detraction for every ordered pair and strongness for every
/// adjacency entry.
#[derive(Debug, Clone, Default)]
pub struct ForceMaps {
    len: usize,
    detraction: Vec<f64>,
    /// `strongness[i][k]` belongs to the link `i -> nodes[i].links[k]`.
    strongness: Vec<Vec<f64>>,
}

impl ForceMaps {
    pub fn compute(nodes: &[Node], physics: &Physics) -> Self {
        let len = nodes.len();
        let mut detraction_map = vec![0.0; len * len];
        for (i, a) in nodes.iter().enumerate() {
            for (j, b) in nodes.iter().enumerate() {
                if i != j {
                    detraction_map[i * len + j] = detraction(a, b, physics);
                }
            }
        }

        let strongness_map = nodes
            .iter()
            .map(|a| {
                a.links
                    .iter()
                    .map(|&j| strongness(a, &nodes[j], physics))
                    .collect()
            })
            .collect();

        Self {
            len,
            detraction: detraction_map,
            strongness: strongness_map,
        }
    }

    pub fn detraction(&self, i: usize, j: usize) -> f64 {
        self.detraction[i * self.len + j]
    }

    /// Strongness of the `k`-th link of node `i`.
    pub fn strongness(&self, i: usize, k: usize) -> f64 {
        self.strongness[i][k]
    }
}
