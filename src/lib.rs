pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod fs;
pub mod interactive;
pub mod layout;
pub mod model;
pub mod render;
pub mod snapshot;
pub mod style;

pub use api::{
    BundleGraphError, layout, layout_with_progress, parse_stats, render_svg, resume,
    resume_with_progress, write_svg,
};
pub use cli::Cli;
pub use commands::{cmd_init, cmd_render, cmd_serve, cmd_snapshot};
pub use config::{Config, NameShortener, RenderOptions};
pub use layout::{Graph, LayoutError, Physics, Progress};
pub use model::Stats;
pub use render::{ColorChannel, Rgb};
pub use snapshot::{GraphSnapshot, SnapshotError};
