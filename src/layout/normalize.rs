//! Bounding-box normalization and the layout-to-pixel transform.

use super::graph::Graph;
use crate::model::Vec2;

/// Spans below this are floored so a degenerate box still yields a finite scale.
const MIN_SPAN: f64 = 1.0;

/// Target canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
        }
    }
}

/// Uniform scale plus the layout-space extent of the normalized box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            width: 0.0,
            height: 0.0,
        }
    }
}

impl Graph {
    /// Move the bounding box's minimum corner to the origin and pick the
    /// largest uniform scale that fits the box inside `viewport`, leaving a
    /// margin of one maximum radius on every side.
    pub fn normalize(&mut self, viewport: Viewport) {
        let Some(first) = self.modules.first() else {
            return;
        };
        let (mut min, mut max) = (first.pos, first.pos);
        for node in &self.modules {
            min = Vec2::new(min.x.min(node.pos.x), min.y.min(node.pos.y));
            max = Vec2::new(max.x.max(node.pos.x), max.y.max(node.pos.y));
        }

        let margin = self.physics.module_max_r * 2.0;
        let span = max - min;
        let scale = ((viewport.width - margin) / span.x.max(MIN_SPAN))
            .min((viewport.height - margin) / span.y.max(MIN_SPAN));

        for node in &mut self.modules {
            node.pos = node.pos - min;
        }
        self.transform = Transform {
            scale,
            width: span.x,
            height: span.y,
        };
    }

    /// Pixel size of the drawing under the current transform.
    pub fn canvas_size(&self) -> (f64, f64) {
        let margin = self.physics.module_max_r * 2.0;
        (
            self.transform.width * self.transform.scale + margin,
            self.transform.height * self.transform.scale + margin,
        )
    }

    pub(crate) fn screen_position(&self, index: usize) -> Vec2 {
        let offset = self.physics.module_max_r;
        let pos = self.modules[index].pos * self.transform.scale;
        Vec2::new(pos.x + offset, pos.y + offset)
    }

    /// Inverse of the pixel mapping used for drawn circles.
    pub fn layout_position(&self, screen: Vec2) -> Vec2 {
        let offset = self.physics.module_max_r;
        Vec2::new(
            (screen.x - offset) / self.transform.scale,
            (screen.y - offset) / self.transform.scale,
        )
    }

    pub(crate) fn radius(&self, index: usize) -> f64 {
        self.physics
            .radius(self.modules[index].size, self.transform.scale)
    }
}
