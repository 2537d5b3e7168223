use crate::fs::FileSystem;
use crate::layout::{Physics, Viewport};
use crate::render::{ColorChannel, Rgb, default_palette};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

pub const CONFIG_FILE: &str = "bundlegraph.toml";

/// Step budget of a batch render when none is given.
pub const DEFAULT_BATCH_STEPS: usize = 5000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Maps a module's full name to the label shown in its tooltip.
#[derive(Clone, Default)]
pub enum NameShortener {
    #[default]
    Identity,
    /// Replace this directory prefix with `.` in every loader-chain segment.
    Context(String),
    Custom(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl fmt::Debug for NameShortener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameShortener::Identity => f.write_str("Identity"),
            NameShortener::Context(context) => f.debug_tuple("Context").field(context).finish(),
            NameShortener::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl NameShortener {
    pub fn shorten(&self, name: &str) -> String {
        match self {
            NameShortener::Identity => name.to_string(),
            NameShortener::Context(context) => name
                .split('!')
                .map(|part| shorten_part(part, context))
                .collect::<Vec<_>>()
                .join("!"),
            NameShortener::Custom(shorten) => shorten(name),
        }
    }
}

fn shorten_part(part: &str, context: &str) -> String {
    let context = context.trim_end_matches(['/', '\\']);
    if context.is_empty() {
        return part.to_string();
    }
    match part.strip_prefix(context) {
        Some("") => ".".to_string(),
        Some(rest) if rest.starts_with(['/', '\\']) => format!(".{}", rest),
        _ => part.to_string(),
    }
}

/// Everything that shapes one render, with the defaults of a batch run.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub name_shortener: NameShortener,
    /// Embed the live client script and the layout snapshot.
    pub interactive: bool,
    /// `None` means 5000 steps in batch mode and none in interactive mode.
    pub max_steps: Option<usize>,
    pub width: f64,
    pub height: f64,
    pub color_by: ColorChannel,
    /// Draw swatches that switch the active colour channel on hover.
    pub color_switch: bool,
    /// Palette override; the default palette is used when `None`.
    pub colors: Option<Vec<Rgb>>,
    /// Seed of the overlap jitter; entropy when `None`.
    pub seed: Option<u64>,
    pub physics: Physics,
}

impl Default for RenderOptions {
    fn default() -> Self {
        let viewport = Viewport::default();
        Self {
            name_shortener: NameShortener::Identity,
            interactive: false,
            max_steps: None,
            width: viewport.width,
            height: viewport.height,
            color_by: ColorChannel::Files,
            color_switch: false,
            colors: None,
            seed: None,
            physics: Physics::default(),
        }
    }
}

impl RenderOptions {
    pub fn step_budget(&self) -> usize {
        match self.max_steps {
            Some(steps) => steps,
            None if self.interactive => 0,
            None => DEFAULT_BATCH_STEPS,
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.width,
            height: self.height,
        }
    }

    pub fn palette(&self) -> Vec<Rgb> {
        match &self.colors {
            Some(colors) if !colors.is_empty() => colors.clone(),
            _ => default_palette(),
        }
    }
}

/// Live server settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ServeSettings {
    pub port: u16,
    pub steps_per_tick: usize,
    pub tick_ms: u64,
}

impl Default for ServeSettings {
    fn default() -> Self {
        Self {
            port: 3000,
            steps_per_tick: 1,
            tick_ms: 10,
        }
    }
}

/// Contents of `bundlegraph.toml`, with defaults for everything left out.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub render: RenderOptions,
    pub serve: ServeSettings,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    layout: Option<RawLayout>,
    colors: Option<RawColors>,
    physics: Option<Physics>,
    serve: Option<RawServe>,
}

#[derive(Debug, Deserialize)]
struct RawLayout {
    width: Option<f64>,
    height: Option<f64>,
    max_steps: Option<usize>,
    seed: Option<u64>,
    context: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawColors {
    by: Option<ColorChannel>,
    switch: Option<bool>,
    palette: Option<Vec<Rgb>>,
}

#[derive(Debug, Deserialize)]
struct RawServe {
    port: Option<u16>,
    steps_per_tick: Option<usize>,
    tick_ms: Option<u64>,
}

impl Config {
    /// Load `bundlegraph.toml` from `dir`, or defaults if there is none.
    pub fn load(dir: &Path, fs: &dyn FileSystem) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILE);

        if !fs.exists(&config_path) {
            return Ok(Self::default());
        }

        let content = fs.read_to_string(&config_path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;
        let mut config = Self::default();
        let render = &mut config.render;

        if let Some(layout) = raw.layout {
            if let Some(width) = layout.width {
                render.width = width;
            }
            if let Some(height) = layout.height {
                render.height = height;
            }
            render.max_steps = layout.max_steps;
            render.seed = layout.seed;
            if let Some(context) = layout.context {
                render.name_shortener = NameShortener::Context(context);
            }
        }

        if let Some(colors) = raw.colors {
            render.color_by = colors.by.unwrap_or_default();
            render.color_switch = colors.switch.unwrap_or(false);
            render.colors = colors.palette;
        }

        if let Some(physics) = raw.physics {
            render.physics = physics;
        }

        if let Some(serve) = raw.serve {
            let defaults = ServeSettings::default();
            config.serve = ServeSettings {
                port: serve.port.unwrap_or(defaults.port),
                steps_per_tick: serve.steps_per_tick.unwrap_or(defaults.steps_per_tick),
                tick_ms: serve.tick_ms.unwrap_or(defaults.tick_ms),
            };
        }

        Ok(config)
    }
}

pub fn generate_config_template() -> String {
    r#"# bundlegraph configuration
# Every key is optional; command-line flags take precedence.

[layout]
# Maximum size of the rendered SVG in pixels.
width = 1920
height = 1080
# Simulation step budget (defaults to 5000, or 0 for --interactive).
# max_steps = 5000
# Fixed seed for reproducible layouts.
# seed = 42
# Shorten module names relative to this directory.
# context = "/path/to/project"

[colors]
# Fill modules by "files", "loaders" or "package".
by = "files"
# Draw swatches that switch between the three colourings on hover.
switch = false
# palette = [[0, 80, 160], [240, 160, 0]]

[physics]
# force_inter = 2.0
# force_link = 0.02
# min_distance = 400.0
# damping = 0.8

[serve]
port = 3000
steps_per_tick = 1
tick_ms = 10
"#
    .to_string()
}
