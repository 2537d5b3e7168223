use super::LayoutError;
use super::forces::ForceMaps;
use super::links::LinkResolver;
use super::normalize::Transform;
use super::physics::Physics;
use super::seed::seed_positions;
use crate::model::{Node, PendingNode, Stats, Vec2};
use crate::render::ColorsMap;
use crate::snapshot::{GraphSnapshot, NodeSnapshot, SNAPSHOT_VERSION};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// One layout session: the owned node set, its precomputed force maps and
/// the pixel transform derived from the last normalization.
pub struct Graph {
    pub(super) modules: Vec<Node>,
    pub(super) maps: ForceMaps,
    pub(super) physics: Physics,
    pub(super) transform: Transform,
    pub(super) rng: StdRng,
    colors_map: ColorsMap,
}

impl Graph {
    /// Build a fresh graph from a bundler report and seed its positions.
    pub fn from_stats(
        stats: &Stats,
        physics: Physics,
        seed: Option<u64>,
    ) -> Result<Self, LayoutError> {
        let pending: Vec<PendingNode> = stats
            .module_ids()
            .into_iter()
            .filter_map(|id| Node::from_stats(id, stats))
            .collect();

        let mut graph = Self::assemble(pending, physics, seed)?;
        graph.reset_positions();
        Ok(graph)
    }

    /// Resume a previous layout. Positions and speeds come from the
    /// snapshot; adjacency and force maps are recomputed.
    pub fn load(
        snapshot: &GraphSnapshot,
        physics: Physics,
        seed: Option<u64>,
    ) -> Result<Self, LayoutError> {
        let pending = snapshot
            .modules_list
            .iter()
            .map(NodeSnapshot::to_pending)
            .collect();

        let mut graph = Self::assemble(pending, physics, seed)?;
        graph.transform.scale = snapshot.scale;
        graph.colors_map = snapshot.colors_map.clone();
        Ok(graph)
    }

    fn assemble(
        pending: Vec<PendingNode>,
        physics: Physics,
        seed: Option<u64>,
    ) -> Result<Self, LayoutError> {
        if pending.is_empty() {
            return Err(LayoutError::EmptyGraph);
        }

        let modules = LinkResolver::new(pending).resolve().propagate();
        let maps = ForceMaps::compute(&modules, &physics);
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            modules,
            maps,
            physics,
            transform: Transform::default(),
            rng,
            colors_map: ColorsMap::default(),
        })
    }

    pub fn to_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            version: SNAPSHOT_VERSION,
            scale: self.transform.scale,
            modules_list: self.modules.iter().map(NodeSnapshot::from).collect(),
            colors_map: self.colors_map.clone(),
        }
    }

    /// Reseed all positions from the first module and zero all speeds.
    pub fn reset_positions(&mut self) {
        seed_positions(&mut self.modules, &self.physics);
    }

    pub fn modules(&self) -> &[Node] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn physics(&self) -> &Physics {
        &self.physics
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn detraction(&self, i: usize, j: usize) -> f64 {
        self.maps.detraction(i, j)
    }

    /// Strongness of the `k`-th link of module `i`.
    pub fn strongness(&self, i: usize, k: usize) -> f64 {
        self.maps.strongness(i, k)
    }

    pub fn colors_map(&self) -> &ColorsMap {
        &self.colors_map
    }

    pub fn set_colors_map(&mut self, colors_map: ColorsMap) {
        self.colors_map = colors_map;
    }

    /// Pin module `index` to `pos` in layout space and drop its speed.
    pub fn set_position(&mut self, index: usize, pos: Vec2) -> Result<(), LayoutError> {
        let node = self
            .modules
            .get_mut(index)
            .ok_or(LayoutError::UnknownNode(index))?;
        node.pos = pos;
        node.speed = Vec2::ZERO;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(json: &str) -> Stats {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_empty_report_fails_fast() {
        let result = Graph::from_stats(&Stats::default(), Physics::default(), None);
        assert!(matches!(result, Err(LayoutError::EmptyGraph)));

        let orphan = stats(r#"{ "modules": [{}], "chunks": {} }"#);
        let result = Graph::from_stats(&orphan, Physics::default(), None);
        assert!(matches!(result, Err(LayoutError::EmptyGraph)));
    }

    #[test]
    fn test_modules_without_chunk_are_skipped() {
        let report = stats(
            r#"{
                "modules": [{}, {}, {}],
                "chunks": { "main.js": { "modules": [
                    { "id": 0, "size": 1, "request": "a" },
                    { "id": 2, "size": 1, "request": "c" }
                ] } }
            }"#,
        );
        let graph = Graph::from_stats(&report, Physics::default(), Some(1)).unwrap();
        let ids: Vec<_> = graph.modules().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![0, 2]);
    }

    #[test]
    fn test_colliding_listing_ids_build_one_node() {
        let report = stats(
            r#"{
                "modules": [{ "id": 1 }, {}],
                "chunks": { "main.js": { "modules": [{ "id": 1, "size": 8, "request": "a" }] } }
            }"#,
        );
        let graph = Graph::from_stats(&report, Physics::default(), Some(1)).unwrap();
        let ids: Vec<_> = graph.modules().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_set_position_unknown_index() {
        let report = stats(
            r#"{ "modules": [{}], "chunks": { "m": { "modules": [{ "id": 0, "size": 4 }] } } }"#,
        );
        let mut graph = Graph::from_stats(&report, Physics::default(), Some(1)).unwrap();
        assert!(graph.set_position(0, Vec2::new(5.0, 5.0)).is_ok());
        assert_eq!(graph.modules()[0].pos, Vec2::new(5.0, 5.0));
        assert!(matches!(
            graph.set_position(3, Vec2::ZERO),
            Err(LayoutError::UnknownNode(3))
        ));
    }
}
