//! Backends that receive projected scene primitives.

use super::scene::{Circle, Line};
use serde::Serialize;
use std::collections::HashMap;
use std::io;

/// Receives the canvas size and every line and circle of one projection.
pub trait SceneSink {
    fn canvas(&mut self, width: f64, height: f64) -> io::Result<()>;
    fn line(&mut self, line: &Line) -> io::Result<()>;
    fn circle(&mut self, circle: &Circle) -> io::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircleGeometry {
    pub id: String,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineGeometry {
    pub id: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Geometry of every element of a live scene, addressed by element id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub circles: Vec<CircleGeometry>,
    pub lines: Vec<LineGeometry>,
}

/// A retained scene that is mutated in place by each projection.
///
/// Elements are matched by id, so repeated projections of the same graph
/// only move existing elements.
#[derive(Debug, Clone, Default)]
pub struct LiveScene {
    frame: Frame,
    circle_index: HashMap<String, usize>,
    line_index: HashMap<String, usize>,
}

impl LiveScene {
    pub fn frame(&self) -> &Frame {
        &self.frame
    }
}

impl SceneSink for LiveScene {
    fn canvas(&mut self, width: f64, height: f64) -> io::Result<()> {
        self.frame.width = width;
        self.frame.height = height;
        Ok(())
    }

    fn line(&mut self, line: &Line) -> io::Result<()> {
        let geometry = LineGeometry {
            id: line.element_id(),
            x1: line.start.x,
            y1: line.start.y,
            x2: line.end.x,
            y2: line.end.y,
        };
        match self.line_index.get(&geometry.id) {
            Some(&idx) => self.frame.lines[idx] = geometry,
            None => {
                self.line_index
                    .insert(geometry.id.clone(), self.frame.lines.len());
                self.frame.lines.push(geometry);
            }
        }
        Ok(())
    }

    fn circle(&mut self, circle: &Circle) -> io::Result<()> {
        let geometry = CircleGeometry {
            id: circle.element_id(),
            cx: circle.center.x,
            cy: circle.center.y,
            r: circle.radius,
        };
        match self.circle_index.get(&geometry.id) {
            Some(&idx) => self.frame.circles[idx] = geometry,
            None => {
                self.circle_index
                    .insert(geometry.id.clone(), self.frame.circles.len());
                self.frame.circles.push(geometry);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Vec2;
    use crate::render::{LineKind, Relation, Rgb};

    fn circle(x: f64) -> Circle {
        Circle {
            node: 0,
            center: Vec2::new(x, 1.0),
            radius: 5.0,
            main: false,
            fill: Rgb(0, 0, 0),
            fills: [Rgb(0, 0, 0); 3],
            link_count: 0,
            title: String::new(),
        }
    }

    #[test]
    fn test_live_scene_updates_in_place() {
        let mut scene = LiveScene::default();
        scene.canvas(100.0, 50.0).unwrap();
        scene.circle(&circle(1.0)).unwrap();
        scene.circle(&circle(9.0)).unwrap();

        let frame = scene.frame();
        assert_eq!(frame.circles.len(), 1);
        assert_eq!(frame.circles[0].cx, 9.0);
        assert_eq!(frame.width, 100.0);
    }

    #[test]
    fn test_live_scene_keeps_line_kinds_apart() {
        let mut scene = LiveScene::default();
        let mut line = Line {
            node: 2,
            link: 1,
            kind: LineKind::Thickness { width: 1.0 },
            asynchronous: false,
            start: Vec2::ZERO,
            end: Vec2::new(3.0, 4.0),
        };
        scene.line(&line).unwrap();
        line.kind = LineKind::Hover {
            relation: Relation::Depends,
        };
        scene.line(&line).unwrap();

        let ids: Vec<_> = scene.frame().lines.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["module2line1", "module2link1"]);
    }
}
