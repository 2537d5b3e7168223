//! Tunable constants of the force simulation and the pixel transform.

use serde::{Deserialize, Serialize};

/// Force, distance and sizing constants.
///
/// Distances are in layout units; radii are in pixels after scaling.
/// Every field may be overridden individually from a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Physics {
    /// Inverse-square repulsion between every pair.
    pub force_inter: f64,
    /// Short-range correction below `min_distance`, also scales overlap jitter.
    pub force_hit: f64,
    /// Spring constant of dependency links.
    pub force_link: f64,
    pub link_distance_base: f64,
    pub link_distance_async: f64,
    /// Added to the rest length divided by the link's strongness.
    pub link_distance_extra: f64,
    pub min_distance: f64,
    /// Speed retained from the previous step.
    pub damping: f64,
    /// Distances below this are treated as overlap.
    pub epsilon: f64,
    pub module_scale: f64,
    pub module_min_r: f64,
    pub module_max_r: f64,
    /// Seed spacing between siblings of one BFS layer.
    pub x_spacing: f64,
    /// Seed spacing between BFS layers.
    pub y_spacing: f64,
    pub weight_library_index: f64,
    /// Repulsion bonus between nodes living in different bundles.
    pub extra_detraction_files: f64,
    /// Upper bound of a rendered link's stroke width.
    pub strongness_cap: f64,
    pub min_steps: usize,
    pub movement_threshold: f64,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            force_inter: 2.0,
            force_hit: 0.1,
            force_link: 0.02,
            link_distance_base: 300.0,
            link_distance_async: 500.0,
            link_distance_extra: 300.0,
            min_distance: 400.0,
            damping: 0.8,
            epsilon: 0.00001,
            module_scale: 2.0,
            module_min_r: 5.0,
            module_max_r: 20.0,
            x_spacing: 600.0,
            y_spacing: 7000.0,
            weight_library_index: 5.0,
            extra_detraction_files: 5.0,
            strongness_cap: 5.0,
            min_steps: 10,
            movement_threshold: 10.0,
        }
    }
}

impl Physics {
    /// Rest length of a link with the given strongness.
    pub fn link_distance(&self, asynchronous: bool, strongness: f64) -> f64 {
        let base = if asynchronous {
            self.link_distance_async
        } else {
            self.link_distance_base
        };
        base + self.link_distance_extra / strongness
    }

    /// Pixel radius of a module of `size` bytes under `scale`.
    pub fn radius(&self, size: f64, scale: f64) -> f64 {
        self.module_min_r
            .max(self.module_max_r.min(size.sqrt() * self.module_scale * scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_distance_stretches_weak_links() {
        let physics = Physics::default();
        assert_eq!(physics.link_distance(false, 1.0), 600.0);
        assert_eq!(physics.link_distance(true, 1.0), 800.0);
        assert!(physics.link_distance(false, 0.1) > physics.link_distance(false, 1.0));
    }

    #[test]
    fn test_radius_is_clamped() {
        let physics = Physics::default();
        assert_eq!(physics.radius(0.0, 1.0), 5.0);
        assert_eq!(physics.radius(1_000_000.0, 1.0), 20.0);
        assert_eq!(physics.radius(100.0, 0.5), 10.0);
    }
}
