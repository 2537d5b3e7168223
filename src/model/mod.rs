mod node;
mod stats;

pub use node::{Node, NodeSource, PendingNode, Vec2};
pub use stats::{ChunkStats, ModuleId, ModuleRef, ModuleStats, ModuleSummary, Reason, ReasonKind, Stats};
