//! Persisted layout state.
//!
//! A snapshot keeps only what cannot be recomputed: positions, speeds, the
//! resolved link maps and the scale. Adjacency, library indices and the force
//! maps are rebuilt on load.

use crate::fs::FileSystem;
use crate::model::{ModuleId, Node, NodeSource, PendingNode, Vec2};
use crate::render::{ColorsMap, embedded_snapshot};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use thiserror::Error;

/// Current snapshot format. Snapshots without a version field are version 1.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to access snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported snapshot version {found}")]
    UnsupportedVersion { found: u32 },

    #[error("Document has no embedded snapshot (render it with --interactive)")]
    NotEmbedded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    pub scale: f64,
    /// Order is significant: it fixes seeding roots and colour assignment.
    pub modules_list: Vec<NodeSnapshot>,
    #[serde(default, skip_serializing_if = "ColorsMap::is_empty")]
    pub colors_map: ColorsMap,
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    pub id: ModuleId,
    pub pos: Vec2,
    pub speed: Vec2,
    pub files: Vec<String>,
    pub size: f64,
    #[serde(default)]
    pub links_async_resolved: BTreeMap<ModuleId, bool>,
    #[serde(default)]
    pub links_weight_resolved: BTreeMap<ModuleId, u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub main: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub loaders: Vec<String>,
}

impl From<&Node> for NodeSnapshot {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id,
            pos: node.pos,
            speed: node.speed,
            files: node.files.clone(),
            size: node.size,
            links_async_resolved: node.links_async.iter().map(|id| (*id, true)).collect(),
            links_weight_resolved: node.links_weight.clone(),
            name: node.name.clone(),
            main: node.main,
            loaders: node.loaders.clone(),
        }
    }
}

impl NodeSnapshot {
    /// Node with restored kinematics whose links resolve by id.
    pub fn to_pending(&self) -> PendingNode {
        let node = Node {
            id: self.id,
            name: self.name.clone(),
            files: self.files.clone(),
            size: self.size,
            main: self.main,
            loaders: self.loaders.clone(),
            pos: self.pos,
            speed: self.speed,
            force: Vec2::ZERO,
            ..Default::default()
        };
        let asynchronous: BTreeSet<ModuleId> = self
            .links_async_resolved
            .iter()
            .filter(|(_, is_async)| **is_async)
            .map(|(id, _)| *id)
            .collect();

        PendingNode {
            node,
            source: NodeSource::FromSnapshot {
                weight: self.links_weight_resolved.clone(),
                asynchronous,
            },
        }
    }
}

impl GraphSnapshot {
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: GraphSnapshot = serde_json::from_str(json)?;
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
            });
        }
        Ok(snapshot)
    }

    /// Parse either snapshot JSON or an interactive SVG document carrying one.
    pub fn from_document(content: &str) -> Result<Self, SnapshotError> {
        if !content.trim_start().starts_with('<') {
            return Self::from_json(content);
        }
        let json = embedded_snapshot(content).ok_or(SnapshotError::NotEmbedded)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of undirected links recorded in the resolved weight maps.
    pub fn link_count(&self) -> usize {
        let mut pairs = BTreeSet::new();
        for node in &self.modules_list {
            for other in node.links_weight_resolved.keys() {
                if *other != node.id {
                    pairs.insert((node.id.min(*other), node.id.max(*other)));
                }
            }
        }
        pairs.len()
    }
}

pub fn save_snapshot(
    fs: &dyn FileSystem,
    snapshot: &GraphSnapshot,
    path: &Path,
) -> Result<(), SnapshotError> {
    fs.write(path, &snapshot.to_json()?)?;
    Ok(())
}

pub fn load_snapshot(fs: &dyn FileSystem, path: &Path) -> Result<GraphSnapshot, SnapshotError> {
    let content = fs.read_to_string(path)?;
    GraphSnapshot::from_document(&content)
}
