//! Stable colour assignment for grouping keys.

use crate::model::Node;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// An RGB triple, serialized as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.0, self.1, self.2)
    }
}

/// Channel steps of 80 with the darkest and brightest combinations removed.
pub fn default_palette() -> Vec<Rgb> {
    let mut colors = Vec::new();
    for r in (0..255u16).step_by(80) {
        for g in (0..255u16).step_by(80) {
            for b in (0..255u16).step_by(80) {
                let sum = r + g + b;
                if (100..=550).contains(&sum) {
                    colors.push(Rgb(r as u8, g as u8, b as u8));
                }
            }
        }
    }
    colors
}

/// Hands out palette colours per grouping key, remembering every assignment.
///
/// Colours are taken from the end of the remaining palette; an exhausted
/// palette is refilled from the full set, so colours may eventually repeat.
#[derive(Debug, Clone)]
pub struct ColorAllocator {
    palette: Vec<Rgb>,
    remaining: Vec<Rgb>,
    assigned: BTreeMap<String, Rgb>,
}

impl ColorAllocator {
    pub fn new(palette: Vec<Rgb>) -> Self {
        Self::restore(palette, BTreeMap::new())
    }

    /// Continue a previous allocation. Colours already handed out are not
    /// offered again until the palette is refilled.
    pub fn restore(palette: Vec<Rgb>, assigned: BTreeMap<String, Rgb>) -> Self {
        let palette = if palette.is_empty() {
            default_palette()
        } else {
            palette
        };
        let remaining = palette
            .iter()
            .copied()
            .filter(|color| !assigned.values().any(|used| used == color))
            .collect();
        Self {
            palette,
            remaining,
            assigned,
        }
    }

    /// Colour of the key formed by joining `parts` with spaces.
    pub fn color_for<S: AsRef<str>>(&mut self, parts: &[S]) -> Rgb {
        let key = parts
            .iter()
            .map(|p| p.as_ref())
            .collect::<Vec<_>>()
            .join(" ");
        if let Some(color) = self.assigned.get(&key) {
            return *color;
        }
        if self.remaining.is_empty() {
            self.remaining = self.palette.clone();
        }
        // palette is never empty, see `restore`
        let color = self.remaining.pop().unwrap_or(Rgb(0, 0, 0));
        self.assigned.insert(key, color);
        color
    }

    pub fn assignments(&self) -> &BTreeMap<String, Rgb> {
        &self.assigned
    }
}

/// Which grouping drives a module's primary fill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChannel {
    /// Bundle files containing the module.
    #[default]
    Files,
    /// Loader chain applied to the module.
    Loaders,
    /// Top-level package the module was installed from.
    Package,
}

impl ColorChannel {
    pub fn index(self) -> usize {
        match self {
            ColorChannel::Files => 0,
            ColorChannel::Loaders => 1,
            ColorChannel::Package => 2,
        }
    }
}

/// Persisted assignments of the three colour channels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorsMap {
    #[serde(default)]
    pub files: BTreeMap<String, Rgb>,
    #[serde(default)]
    pub loaders: BTreeMap<String, Rgb>,
    #[serde(default)]
    pub modules: BTreeMap<String, Rgb>,
}

impl ColorsMap {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.loaders.is_empty() && self.modules.is_empty()
    }
}

/// One allocator per channel, for one render session.
#[derive(Debug, Clone)]
pub struct ColorChannels {
    files: ColorAllocator,
    loaders: ColorAllocator,
    modules: ColorAllocator,
}

impl ColorChannels {
    pub fn new(palette: &[Rgb], restored: &ColorsMap) -> Self {
        Self {
            files: ColorAllocator::restore(palette.to_vec(), restored.files.clone()),
            loaders: ColorAllocator::restore(palette.to_vec(), restored.loaders.clone()),
            modules: ColorAllocator::restore(palette.to_vec(), restored.modules.clone()),
        }
    }

    /// Colours of `node` indexed by [`ColorChannel::index`].
    pub fn colors_for(&mut self, node: &Node) -> [Rgb; 3] {
        let package: Vec<&str> = node
            .name
            .as_deref()
            .and_then(package_name)
            .into_iter()
            .collect();
        [
            self.files.color_for(&node.files),
            self.loaders.color_for(&node.loaders),
            self.modules.color_for(&package),
        ]
    }

    pub fn to_map(&self) -> ColorsMap {
        ColorsMap {
            files: self.files.assignments().clone(),
            loaders: self.loaders.assignments().clone(),
            modules: self.modules.assignments().clone(),
        }
    }
}

static PACKAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:web|node)_modules[\\/]([^\\/]+)[\\/][^!]*?$").expect("valid package pattern")
});

/// Top-level package directory of the last loader-chain segment, if the
/// module lives under `node_modules` or `web_modules`.
pub fn package_name(name: &str) -> Option<&str> {
    PACKAGE_PATTERN
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
