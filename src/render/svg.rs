//! SVG document output.

use super::assets::{HOVER_SCRIPT, LIVE_SCRIPT, STYLE};
use super::scene::{Circle, Line, LineKind, SceneBuilder};
use super::sink::SceneSink;
use crate::config::RenderOptions;
use crate::layout::Graph;
use std::borrow::Cow;
use std::io::{self, Write};

/// Id of the embedded snapshot element in interactive documents.
pub const SNAPSHOT_ELEMENT_ID: &str = "bundlegraph-snapshot";

/// Writes scene primitives as SVG elements. `canvas` opens the document;
/// the caller closes it.
pub struct SvgEmitter<W: Write> {
    out: W,
}

impl<W: Write> SvgEmitter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SceneSink for SvgEmitter<W> {
    fn canvas(&mut self, width: f64, height: f64) -> io::Result<()> {
        writeln!(self.out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            self.out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" id="wpgraph" version="1.1" baseProfile="full" width="{}" height="{}">"#,
            width, height
        )?;
        writeln!(self.out, r#"<style type="text/css">"#)?;
        writeln!(self.out, "{}", STYLE)?;
        writeln!(self.out, "</style>")
    }

    fn line(&mut self, line: &Line) -> io::Result<()> {
        write!(
            self.out,
            r#"<line class="{}" id="{}" x1="{}" y1="{}" x2="{}" y2="{}""#,
            line.class(),
            line.element_id(),
            line.start.x,
            line.start.y,
            line.end.x,
            line.end.y
        )?;
        match line.kind {
            LineKind::Thickness { width } => {
                writeln!(self.out, r#" style="stroke-width:{}"/>"#, width)
            }
            LineKind::Hover { .. } => writeln!(self.out, "/>"),
        }
    }

    fn circle(&mut self, circle: &Circle) -> io::Result<()> {
        let class = if circle.main { "module main" } else { "module" };
        write!(
            self.out,
            r#"<circle id="{}" class="{}" cx="{}" cy="{}" r="{}" fill="{}" fill0="{}" fill1="{}" fill2="{}" "#,
            circle.element_id(),
            class,
            circle.center.x,
            circle.center.y,
            circle.radius,
            circle.fill,
            circle.fills[0],
            circle.fills[1],
            circle.fills[2]
        )?;
        writeln!(
            self.out,
            r#"onmouseover="a({},{})" onmouseout="c()"><title>{}</title></circle>"#,
            circle.node,
            circle.link_count,
            escape_xml(&circle.title)
        )
    }
}

/// Render the complete document for `graph` into `out`.
///
/// Colours continue from the graph's colour caches and the caches are
/// updated with every new assignment, so a resumed layout keeps its colours.
pub fn render_document<W: Write>(
    graph: &mut Graph,
    options: &RenderOptions,
    out: &mut W,
) -> io::Result<()> {
    let builder = SceneBuilder::prepare(graph, options);
    write_document(graph, &builder, options, out)
}

/// Stream the document: header and style, the projected scene, the optional
/// colour switch, the hover script and, in interactive mode, the live script
/// plus the layout snapshot.
pub fn write_document<W: Write>(
    graph: &Graph,
    builder: &SceneBuilder,
    options: &RenderOptions,
    out: &mut W,
) -> io::Result<()> {
    let mut emitter = SvgEmitter::new(&mut *out);
    builder.project(graph, &mut emitter)?;

    if options.color_switch {
        writeln!(
            out,
            r#"<rect x="5" y="5" width="20" height="20" onmouseover="setColors(0);" style="fill:rgb(0,0,255)"/>"#
        )?;
        writeln!(
            out,
            r#"<rect x="35" y="5" width="20" height="20" onmouseover="setColors(1);" style="fill:rgb(0,255,0)"/>"#
        )?;
        writeln!(
            out,
            r#"<rect x="65" y="5" width="20" height="20" onmouseover="setColors(2);" style="fill:rgb(255,0,0)"/>"#
        )?;
    }

    write_script(out, HOVER_SCRIPT)?;

    if options.interactive {
        let snapshot = graph.to_snapshot().to_json().map_err(io::Error::other)?;
        writeln!(
            out,
            r#"<script type="application/json" id="{}">{}</script>"#,
            SNAPSHOT_ELEMENT_ID,
            escape_xml(&snapshot)
        )?;
        write_script(out, LIVE_SCRIPT)?;
    }

    writeln!(out, "</svg>")
}

fn write_script<W: Write>(out: &mut W, source: &str) -> io::Result<()> {
    writeln!(out, r#"<script type="text/ecmascript">"#)?;
    writeln!(out, "{}", escape_xml(source))?;
    writeln!(out, "</script>")
}

/// Escape text for XML content and double- or single-quoted attributes.
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}

/// Inverse of [`escape_xml`].
pub fn unescape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&apos;", "'")
            .replace("&amp;", "&"),
    )
}

/// The snapshot JSON embedded by an interactive document, if there is one.
pub fn embedded_snapshot(document: &str) -> Option<String> {
    let marker = format!(r#"id="{}""#, SNAPSHOT_ELEMENT_ID);
    let element = document.find(&marker)?;
    let start = element + document[element..].find('>')? + 1;
    let end = start + document[start..].find("</script>")?;
    Some(unescape_xml(document[start..end].trim()).into_owned())
}
