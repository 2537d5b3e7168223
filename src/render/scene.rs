//! Projection of a laid-out graph into drawable primitives.

use super::color::{ColorChannel, ColorChannels, Rgb};
use super::sink::SceneSink;
use crate::config::RenderOptions;
use crate::layout::Graph;
use crate::model::Vec2;
use std::io;

/// Which way a link's dependency runs, seen from the node that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Both nodes depend on each other.
    Mutual,
    /// The owning node depends on the other one.
    Depends,
    /// The other node depends on the owning node.
    Required,
}

impl Relation {
    pub fn class(self) -> &'static str {
        match self {
            Relation::Mutual => "reqdep",
            Relation::Depends => "dep",
            Relation::Required => "req",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineKind {
    /// Always-visible stroke whose width follows the link's strongness.
    Thickness { width: f64 },
    /// Invisible until its node is hovered.
    Hover { relation: Relation },
}

/// One drawn segment of the `link`-th link of module `node`.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub node: usize,
    pub link: usize,
    pub kind: LineKind,
    pub asynchronous: bool,
    /// Endpoints are ordered by module id.
    pub start: Vec2,
    pub end: Vec2,
}

impl Line {
    pub fn element_id(&self) -> String {
        match self.kind {
            LineKind::Thickness { .. } => format!("module{}line{}", self.node, self.link),
            LineKind::Hover { .. } => format!("module{}link{}", self.node, self.link),
        }
    }

    pub fn class(&self) -> String {
        let prefix = if self.asynchronous { "async " } else { "" };
        match self.kind {
            LineKind::Thickness { .. } => prefix.to_string(),
            LineKind::Hover { relation } => format!("{}{}", prefix, relation.class()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub node: usize,
    pub center: Vec2,
    pub radius: f64,
    pub main: bool,
    pub fill: Rgb,
    /// Colours of every channel, indexed by [`ColorChannel::index`].
    pub fills: [Rgb; 3],
    pub link_count: usize,
    pub title: String,
}

impl Circle {
    pub fn element_id(&self) -> String {
        format!("module{}", self.node)
    }
}

struct NodeStyle {
    fills: [Rgb; 3],
    title: String,
}

/// Styling resolved once per render: colours and tooltips do not change
/// while the layout moves, so live frames only recompute geometry.
pub struct SceneBuilder {
    styles: Vec<NodeStyle>,
    channel: ColorChannel,
}

impl SceneBuilder {
    pub fn new(graph: &Graph, options: &RenderOptions, colors: &mut ColorChannels) -> Self {
        let styles = graph
            .modules()
            .iter()
            .map(|node| {
                let name = node.name.as_deref().unwrap_or_default();
                let shortened = options.name_shortener.shorten(name);
                let mut title = shortened.split('!').collect::<Vec<_>>().join("\n\n");
                title.push_str("\n\nChunks:\n");
                title.push_str(&node.files.join("\n"));
                NodeStyle {
                    fills: colors.colors_for(node),
                    title,
                }
            })
            .collect();

        Self {
            styles,
            channel: options.color_by,
        }
    }

    /// Build the styling for `graph`, continuing its colour caches and
    /// storing every new assignment back into them.
    pub fn prepare(graph: &mut Graph, options: &RenderOptions) -> Self {
        let mut colors = ColorChannels::new(&options.palette(), graph.colors_map());
        let builder = Self::new(graph, options, &mut colors);
        graph.set_colors_map(colors.to_map());
        builder
    }

    /// Emit the canvas, then every thickness line, then every hover line,
    /// then every circle, so circles paint above the links.
    pub fn project(&self, graph: &Graph, sink: &mut dyn SceneSink) -> io::Result<()> {
        let (width, height) = graph.canvas_size();
        sink.canvas(width, height)?;

        for line in self.lines(graph).filter(|l| matches!(l.kind, LineKind::Thickness { .. })) {
            sink.line(&line)?;
        }
        for line in self.lines(graph).filter(|l| matches!(l.kind, LineKind::Hover { .. })) {
            sink.line(&line)?;
        }

        for (i, node) in graph.modules().iter().enumerate() {
            let Some(style) = self.styles.get(i) else {
                continue;
            };
            sink.circle(&Circle {
                node: i,
                center: graph.screen_position(i),
                radius: graph.radius(i),
                main: node.main,
                fill: style.fills[self.channel.index()],
                fills: style.fills,
                link_count: node.links.len(),
                title: style.title.clone(),
            })?;
        }
        Ok(())
    }

    fn lines<'a>(&'a self, graph: &'a Graph) -> impl Iterator<Item = Line> + 'a {
        let modules = graph.modules();
        let cap = graph.physics().strongness_cap;

        modules.iter().enumerate().flat_map(move |(i, node)| {
            node.links.iter().enumerate().flat_map(move |(k, &j)| {
                let other = &modules[j];
                let (start, end) = if other.id < node.id {
                    (graph.screen_position(j), graph.screen_position(i))
                } else {
                    (graph.screen_position(i), graph.screen_position(j))
                };
                let asynchronous = node.async_link(other) || other.async_link(node);
                let (depends, required) = (node.depends_on(other), other.depends_on(node));
                let relation = match (depends, required) {
                    (true, true) => Relation::Mutual,
                    (true, false) => Relation::Depends,
                    _ => Relation::Required,
                };

                let line = |kind| Line {
                    node: i,
                    link: k,
                    kind,
                    asynchronous,
                    start,
                    end,
                };
                let thickness = depends.then(|| {
                    line(LineKind::Thickness {
                        width: graph.strongness(i, k).min(cap),
                    })
                });
                thickness
                    .into_iter()
                    .chain(std::iter::once(line(LineKind::Hover { relation })))
            })
        })
    }
}
