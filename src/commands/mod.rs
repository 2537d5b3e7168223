mod init;
mod render;
mod serve;
mod snapshot;

pub use init::{cmd_init, cmd_init_with_fs};
pub use render::{cmd_render, cmd_render_with_fs};
pub use serve::cmd_serve;
pub use snapshot::{cmd_snapshot, cmd_snapshot_with_fs};

use crate::api::{self, BundleGraphError};
use crate::cli::LayoutArgs;
use crate::config::{Config, NameShortener, RenderOptions};
use crate::fs::FileSystem;
use crate::layout::{Graph, Progress};
use crate::render::ColorChannel;
use crate::snapshot::load_snapshot;
use crate::style;
use std::io::Read;

/// Resolved configuration for one layout command: the config file merged
/// with the command-line flags.
pub struct CommandContext {
    pub config: Config,
    pub options: RenderOptions,
}

/// A converged layout and the number of steps it took.
pub struct LayoutOutcome {
    pub graph: Graph,
    pub steps: usize,
}

impl CommandContext {
    /// An unreadable config file falls back to defaults with a warning.
    pub fn new(args: &LayoutArgs, interactive: bool, fs: &dyn FileSystem) -> Self {
        let config = Config::load(&args.config_dir, fs).unwrap_or_else(|e| {
            style::warning(&format!("Failed to load config: {}. Using defaults.", e));
            Config::default()
        });

        let mut options = config.render.clone();
        options.interactive = interactive;
        if let Some(context) = &args.context {
            let context = std::path::absolute(context).unwrap_or_else(|_| context.clone());
            options.name_shortener = NameShortener::Context(context.display().to_string());
        }
        if args.steps.is_some() {
            options.max_steps = args.steps;
        }
        if let Some(width) = args.width {
            options.width = width;
        }
        if let Some(height) = args.height {
            options.height = height;
        }
        if args.color_by_module {
            options.color_by = ColorChannel::Package;
        } else if args.color_by_loaders {
            options.color_by = ColorChannel::Loaders;
        }
        options.color_switch |= args.color_switch;
        if args.seed.is_some() {
            options.seed = args.seed;
        }

        Self { config, options }
    }

    /// Run the layout from a snapshot or a report, printing progress.
    /// Returns Err(exit_code) on failure.
    pub fn build_graph(
        &self,
        args: &LayoutArgs,
        fs: &dyn FileSystem,
    ) -> Result<LayoutOutcome, i32> {
        let mut steps = 0;
        let on_progress = |p: Progress| {
            steps = p.step;
            style::progress(p.percent());
        };

        let result = match &args.from_snapshot {
            Some(path) => {
                if args.input.is_some() {
                    style::warning("Ignoring the report input, starting from the snapshot");
                }
                load_snapshot(fs, path)
                    .map_err(BundleGraphError::from)
                    .and_then(|snapshot| {
                        api::resume_with_progress(&snapshot, &self.options, on_progress)
                    })
            }
            None => read_input(args, fs)
                .and_then(|json| api::parse_stats(&json))
                .and_then(|stats| api::layout_with_progress(&stats, &self.options, on_progress)),
        };
        style::progress_done();

        match result {
            Ok(graph) => Ok(LayoutOutcome { graph, steps }),
            Err(e) => {
                style::error(&format!("Layout failed: {}", e));
                Err(1)
            }
        }
    }
}

fn read_input(args: &LayoutArgs, fs: &dyn FileSystem) -> Result<String, BundleGraphError> {
    match &args.input {
        Some(path) => Ok(fs.read_to_string(path)?),
        None => {
            let mut json = String::new();
            std::io::stdin().read_to_string(&mut json)?;
            Ok(json)
        }
    }
}
