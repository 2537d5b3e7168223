//! Tick-driven live simulation.

use crate::config::RenderOptions;
use crate::layout::{Graph, LayoutError};
use crate::model::Vec2;
use crate::render::{SceneBuilder, SceneSink, write_document};
use crate::snapshot::GraphSnapshot;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Paused,
    Running,
    /// Run exactly one step on the next tick, then pause.
    SteppingOnce,
}

/// A module held at a fixed layout position by the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragOverride {
    pub node: usize,
    pub position: Vec2,
}

/// Owns one live layout session. An external scheduler calls [`tick`]
/// repeatedly; every other method only changes what the next tick does.
///
/// [`tick`]: InteractiveController::tick
pub struct InteractiveController {
    graph: Graph,
    builder: SceneBuilder,
    options: RenderOptions,
    state: RunState,
    drag: Option<DragOverride>,
    steps_per_tick: usize,
}

impl InteractiveController {
    pub fn new(mut graph: Graph, options: RenderOptions, steps_per_tick: usize) -> Self {
        let options = RenderOptions {
            interactive: true,
            ..options
        };
        let builder = SceneBuilder::prepare(&mut graph, &options);
        graph.normalize(options.viewport());

        Self {
            graph,
            builder,
            options,
            state: RunState::Running,
            drag: None,
            steps_per_tick: steps_per_tick.max(1),
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn drag(&self) -> Option<DragOverride> {
        self.drag
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn pause(&mut self) {
        self.state = RunState::Paused;
    }

    pub fn resume(&mut self) {
        self.state = RunState::Running;
    }

    pub fn step_once(&mut self) {
        self.state = RunState::SteppingOnce;
    }

    /// Pin `node` under the pointer at `screen` pixels. Starts a drag or
    /// moves the current one.
    pub fn drag_to(&mut self, node: usize, screen: Vec2) -> Result<(), LayoutError> {
        let position = self.graph.layout_position(screen);
        self.graph.set_position(node, position)?;
        self.drag = Some(DragOverride { node, position });
        Ok(())
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Advance according to the run state, re-pin any dragged module,
    /// renormalize unless a drag is active, and project into `sink`.
    /// Returns the number of simulation steps taken.
    pub fn tick(&mut self, sink: &mut dyn SceneSink) -> io::Result<usize> {
        let steps = match self.state {
            RunState::Paused => 0,
            RunState::Running => self.steps_per_tick,
            RunState::SteppingOnce => {
                self.state = RunState::Paused;
                1
            }
        };

        for _ in 0..steps {
            self.graph.step();
            self.pin_dragged();
        }

        // Renormalizing would move the dragged module away from the pointer.
        if self.drag.is_none() {
            self.graph.normalize(self.options.viewport());
        }

        self.project(sink)?;
        Ok(steps)
    }

    pub fn project(&self, sink: &mut dyn SceneSink) -> io::Result<()> {
        self.builder.project(&self.graph, sink)
    }

    pub fn write_document<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write_document(&self.graph, &self.builder, &self.options, out)
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        self.graph.to_snapshot()
    }

    fn pin_dragged(&mut self) {
        if let Some(drag) = self.drag {
            if self.graph.set_position(drag.node, drag.position).is_err() {
                self.drag = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Physics;
    use crate::model::Stats;
    use crate::render::LiveScene;

    fn controller() -> InteractiveController {
        let stats: Stats = serde_json::from_str(
            r#"{
                "modules": [{}, {}, {}],
                "chunks": { "main.js": { "modules": [
                    { "id": 0, "size": 100, "request": "a",
                      "reasons": [{ "type": "require", "module": "b" }] },
                    { "id": 1, "size": 100, "request": "b",
                      "reasons": [{ "type": "require", "module": "c" }] },
                    { "id": 2, "size": 100, "request": "c" }
                ] } }
            }"#,
        )
        .unwrap();
        let graph = Graph::from_stats(&stats, Physics::default(), Some(4)).unwrap();
        InteractiveController::new(graph, RenderOptions::default(), 2)
    }

    fn positions(controller: &InteractiveController) -> Vec<Vec2> {
        controller.graph().modules().iter().map(|n| n.pos).collect()
    }

    #[test]
    fn test_running_takes_steps_per_tick() {
        let mut controller = controller();
        let mut scene = LiveScene::default();
        assert_eq!(controller.state(), RunState::Running);
        assert_eq!(controller.tick(&mut scene).unwrap(), 2);
        assert_eq!(scene.frame().circles.len(), 3);
    }

    #[test]
    fn test_paused_does_not_move() {
        let mut controller = controller();
        let mut scene = LiveScene::default();
        controller.tick(&mut scene).unwrap();
        controller.pause();
        let before = positions(&controller);

        assert_eq!(controller.tick(&mut scene).unwrap(), 0);
        assert_eq!(positions(&controller), before);
    }

    #[test]
    fn test_step_once_then_pause() {
        let mut controller = controller();
        let mut scene = LiveScene::default();
        controller.pause();
        controller.step_once();

        assert_eq!(controller.tick(&mut scene).unwrap(), 1);
        assert_eq!(controller.state(), RunState::Paused);
        assert_eq!(controller.tick(&mut scene).unwrap(), 0);
    }

    #[test]
    fn test_drag_pins_module_under_pointer() {
        let mut controller = controller();
        let mut scene = LiveScene::default();
        let pointer = Vec2::new(300.0, 200.0);

        controller.drag_to(1, pointer).unwrap();
        for _ in 0..5 {
            controller.tick(&mut scene).unwrap();
        }

        let screen = controller.graph().screen_position(1);
        assert!((screen.x - pointer.x).abs() < 1e-6);
        assert!((screen.y - pointer.y).abs() < 1e-6);
        let circle = &scene.frame().circles[1];
        assert!((circle.cx - pointer.x).abs() < 1e-6);

        controller.end_drag();
        assert_eq!(controller.drag(), None);
        controller.tick(&mut scene).unwrap();
        let min_x = controller
            .graph()
            .modules()
            .iter()
            .map(|n| n.pos.x)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(min_x, 0.0);
    }

    #[test]
    fn test_drag_unknown_module() {
        let mut controller = controller();
        let result = controller.drag_to(7, Vec2::ZERO);
        assert!(matches!(result, Err(LayoutError::UnknownNode(7))));
        assert_eq!(controller.drag(), None);
    }

    #[test]
    fn test_document_is_interactive() {
        let controller = controller();
        let mut out = Vec::new();
        controller.write_document(&mut out).unwrap();
        let svg = String::from_utf8(out).unwrap();
        assert!(svg.contains("/api/frame"));
        assert_eq!(controller.snapshot().modules_list.len(), 3);
    }
}
