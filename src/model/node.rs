use super::stats::{ModuleId, ReasonKind, Stats};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::{Add, AddAssign, Mul, Sub};

/// 2D point or vector in layout space. Serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Vec2 {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Vec2> for [f64; 2] {
    fn from(v: Vec2) -> Self {
        [v.x, v.y]
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// A module vertex of the layout graph.
///
/// `links_weight` and `links_async` are directional and fixed once links are
/// resolved. The simulation only ever touches `pos`, `speed` and `force`.
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub id: ModuleId,
    pub name: Option<String>,
    /// Distinct bundle files containing this module, in report order.
    pub files: Vec<String>,
    pub size: f64,
    /// Entry module.
    pub main: bool,
    pub loaders: Vec<String>,
    /// Resolved neighbor id to number of reasons linking them.
    pub links_weight: BTreeMap<ModuleId, u32>,
    /// Resolved neighbor ids reached through an async reference.
    pub links_async: BTreeSet<ModuleId>,
    /// Symmetric adjacency as indices into the owning graph's module list.
    pub links: Vec<usize>,
    pub library_index: f64,
    pub pos: Vec2,
    pub speed: Vec2,
    pub force: Vec2,
}

/// Where a node's outgoing links come from before resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeSource {
    /// Name-keyed links folded from the report's reasons.
    FromReasons {
        weight: BTreeMap<String, u32>,
        asynchronous: BTreeSet<String>,
    },
    /// Id-keyed links restored from a snapshot.
    FromSnapshot {
        weight: BTreeMap<ModuleId, u32>,
        asynchronous: BTreeSet<ModuleId>,
    },
}

/// A node whose links still have to be resolved against the full node set.
#[derive(Debug, Clone)]
pub struct PendingNode {
    pub node: Node,
    pub source: NodeSource,
}

impl Node {
    pub fn new(id: ModuleId) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Build the node for module `id` from every chunk that contains it.
    ///
    /// Returns `None` when no chunk lists the module.
    pub fn from_stats(id: ModuleId, stats: &Stats) -> Option<PendingNode> {
        let mut node = Node::new(id);
        let mut found = None;

        for (file, chunk) in &stats.chunks {
            for module in chunk.modules.iter().filter(|m| m.id == Some(id)) {
                if node.files.last() != Some(file) {
                    node.files.push(file.clone());
                }
                node.size = module.size;
                if let Some(name) = module.display_name() {
                    node.name = Some(name.to_string());
                }
                node.loaders = module.loaders.clone();
                found = Some(module);
            }
        }

        let module = found?;
        let mut weight: BTreeMap<String, u32> = BTreeMap::new();
        let mut asynchronous = BTreeSet::new();

        for reason in &module.reasons {
            let name = match reason.classify() {
                Some(ReasonKind::Main) => {
                    node.main = true;
                    continue;
                }
                Some(ReasonKind::Context) => {
                    let name = reason
                        .module
                        .as_ref()
                        .map(|m| m.to_string())
                        .or_else(|| reason.user_request.clone())
                        .or_else(|| reason.filename.clone());
                    if let Some(name) = &name {
                        if reason.is_async && reason.dirname.is_none() {
                            asynchronous.insert(name.clone());
                        }
                    }
                    name
                }
                Some(ReasonKind::Require) => {
                    let name = reason
                        .module
                        .as_ref()
                        .map(|m| m.to_string())
                        .or_else(|| reason.filename.clone());
                    if let Some(name) = &name {
                        if reason.is_async {
                            asynchronous.insert(name.clone());
                        }
                    }
                    name
                }
                None => None,
            };

            if let Some(name) = name {
                *weight.entry(name).or_insert(0) += 1;
            }
        }

        Some(PendingNode {
            node,
            source: NodeSource::FromReasons {
                weight,
                asynchronous,
            },
        })
    }

    /// Key under which other nodes' reasons refer to this node.
    pub fn lookup_key(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.to_string())
    }

    pub fn depends_on(&self, other: &Node) -> bool {
        self.links_weight.contains_key(&other.id)
    }

    pub fn async_link(&self, other: &Node) -> bool {
        self.links_async.contains(&other.id)
    }

    pub fn distance(&self, other: &Node) -> f64 {
        (self.pos - other.pos).length()
    }

    /// `(other.pos - self.pos) * weight`
    pub fn vector_to(&self, other: &Node, weight: f64) -> Vec2 {
        (other.pos - self.pos) * weight
    }

    pub fn apply_force(&mut self, force: Vec2, weight: f64) {
        self.force += force * weight;
    }

    /// Damp speed, add accumulated force, move, clear the accumulator.
    /// Returns the squared speed after the update.
    pub fn integrate(&mut self, damping: f64) -> f64 {
        self.speed = self.speed * damping + self.force;
        self.pos += self.speed;
        self.force = Vec2::ZERO;
        self.speed.length_squared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(json: &str) -> Stats {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_from_stats_collects_files_and_reasons() {
        let stats = stats(
            r#"{
                "modules": [{}, {}],
                "chunks": {
                    "a.js": { "modules": [{ "id": 1, "size": 40, "request": "./lib.js",
                        "reasons": [
                            { "type": "require", "module": "./main.js" },
                            { "type": "require", "module": "./main.js" },
                            { "type": "require", "module": "./lazy.js", "async": true },
                            { "type": "main" }
                        ] }] },
                    "b.js": { "modules": [{ "id": 1, "size": 40, "request": "./lib.js" }] }
                }
            }"#,
        );

        let pending = Node::from_stats(1, &stats).unwrap();
        let node = pending.node;
        assert_eq!(node.files, vec!["a.js", "b.js"]);
        assert_eq!(node.size, 40.0);
        assert_eq!(node.name.as_deref(), Some("./lib.js"));
        // reasons come from the last chunk entry that lists the module
        assert!(!node.main);

        let NodeSource::FromReasons { weight, .. } = pending.source else {
            panic!("expected reasons source");
        };
        assert!(weight.is_empty());
    }

    #[test]
    fn test_reason_weights_and_async() {
        let stats = stats(
            r#"{
                "modules": [{}],
                "chunks": {
                    "a.js": { "modules": [{ "id": 0, "size": 1, "request": "./lib.js",
                        "reasons": [
                            { "type": "require", "module": "./main.js" },
                            { "type": "require", "module": "./main.js" },
                            { "type": "require", "module": "./lazy.js", "async": true },
                            { "type": "require.context", "userRequest": "./ctx", "async": true, "dirname": "/x" },
                            { "type": "main" }
                        ] }] }
                }
            }"#,
        );

        let pending = Node::from_stats(0, &stats).unwrap();
        assert!(pending.node.main);
        let NodeSource::FromReasons {
            weight,
            asynchronous,
        } = pending.source
        else {
            panic!("expected reasons source");
        };
        assert_eq!(weight.get("./main.js"), Some(&2));
        assert_eq!(weight.get("./lazy.js"), Some(&1));
        assert_eq!(weight.get("./ctx"), Some(&1));
        assert!(asynchronous.contains("./lazy.js"));
        // context reasons with a dirname are never async
        assert!(!asynchronous.contains("./ctx"));
    }

    #[test]
    fn test_missing_module_yields_no_node() {
        let stats = stats(r#"{ "modules": [{}], "chunks": { "a.js": { "modules": [] } } }"#);
        assert!(Node::from_stats(0, &stats).is_none());
    }

    #[test]
    fn test_integrate_damps_and_clears_force() {
        let mut node = Node::new(0);
        node.speed = Vec2::new(10.0, 0.0);
        node.apply_force(Vec2::new(1.0, 2.0), 2.0);

        let movement = node.integrate(0.8);

        assert_eq!(node.speed, Vec2::new(10.0, 4.0));
        assert_eq!(node.pos, Vec2::new(10.0, 4.0));
        assert_eq!(node.force, Vec2::ZERO);
        assert_eq!(movement, 116.0);
    }

    #[test]
    fn test_vec2_serializes_as_pair() {
        let json = serde_json::to_string(&Vec2::new(1.5, -2.0)).unwrap();
        assert_eq!(json, "[1.5,-2.0]");
        let back: Vec2 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Vec2::new(1.5, -2.0));
    }
}
