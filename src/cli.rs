use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bundlegraph")]
#[command(about = "Lay out a bundler's module graph and render it as SVG")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Render a report (or a saved layout) as an SVG document
    Render(RenderArgs),

    /// Lay out a report and save the layout snapshot
    Snapshot(SnapshotArgs),

    /// Serve a live, draggable layout over HTTP
    Serve(ServeArgs),

    /// Generate a starter bundlegraph.toml configuration file
    Init(InitArgs),
}

/// Options shared by every command that runs a layout.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct LayoutArgs {
    /// Bundler stats JSON (defaults to stdin)
    pub input: Option<PathBuf>,

    /// Start from a saved snapshot (or an interactive SVG) instead of a report
    #[arg(long)]
    pub from_snapshot: Option<PathBuf>,

    /// Shorten module names relative to this directory
    #[arg(long)]
    pub context: Option<PathBuf>,

    /// Limit the simulation steps (0 keeps the seed layout)
    #[arg(long)]
    pub steps: Option<usize>,

    /// Maximum width of the output in pixels
    #[arg(long)]
    pub width: Option<f64>,

    /// Maximum height of the output in pixels
    #[arg(long)]
    pub height: Option<f64>,

    /// Colour modules by their loaders
    #[arg(long, conflicts_with = "color_by_module")]
    pub color_by_loaders: bool,

    /// Colour modules by the package they come from
    #[arg(long)]
    pub color_by_module: bool,

    /// Add swatches that switch colourings on hover
    #[arg(long)]
    pub color_switch: bool,

    /// Seed for reproducible layouts
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory containing bundlegraph.toml (defaults to current directory)
    #[arg(long, default_value = ".")]
    pub config_dir: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Output SVG file (defaults to stdout)
    pub output: Option<PathBuf>,

    /// Embed the live script and the layout snapshot
    #[arg(long)]
    pub interactive: bool,

    /// Also save the final layout snapshot to this file
    #[arg(long)]
    pub save_snapshot: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct SnapshotArgs {
    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Save the snapshot to this file
    #[arg(long)]
    pub save: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Port for the HTTP server
    #[arg(long)]
    pub port: Option<u16>,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Directory where to create bundlegraph.toml (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}
