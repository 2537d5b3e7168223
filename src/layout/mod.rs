//! Force-directed layout of module graphs.

mod forces;
mod graph;
mod links;
mod normalize;
mod physics;
mod seed;
mod simulation;

pub use forces::{ForceMaps, detraction, strongness};
pub use graph::Graph;
pub use links::{LinkResolver, ResolvedLinks};
pub use normalize::{Transform, Viewport};
pub use physics::Physics;
pub use seed::seed_positions;
pub use simulation::Progress;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Graph has no modules to lay out")]
    EmptyGraph,
    #[error("No module at index {0}")]
    UnknownNode(usize),
}
