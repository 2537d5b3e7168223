//! Library API for bundlegraph.
//!
//! Unlike the CLI commands, which print output and return exit codes, these
//! functions return `Result` types for calling code to handle.
//!
//! # Example
//!
//! ```no_run
//! use bundlegraph::{RenderOptions, parse_stats, render_svg};
//!
//! let stats = parse_stats(&std::fs::read_to_string("stats.json")?)?;
//! let svg = render_svg(&stats, &RenderOptions::default())?;
//! std::fs::write("graph.svg", svg)?;
//! # Ok::<(), bundlegraph::BundleGraphError>(())
//! ```

use crate::config::{ConfigError, RenderOptions};
use crate::layout::{Graph, LayoutError, Progress};
use crate::model::Stats;
use crate::render::render_document;
use crate::snapshot::{GraphSnapshot, SnapshotError};
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during bundlegraph operations.
#[derive(Debug, Error)]
pub enum BundleGraphError {
    /// The report has nothing to lay out.
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Snapshot could not be read, written or understood.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// The bundler report is not valid JSON.
    #[error("Invalid report: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error while writing the document.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn parse_stats(json: &str) -> Result<Stats, BundleGraphError> {
    Ok(serde_json::from_str(json)?)
}

/// Build, converge and normalize a layout for `stats`.
pub fn layout(stats: &Stats, options: &RenderOptions) -> Result<Graph, BundleGraphError> {
    layout_with_progress(stats, options, |_| {})
}

/// Like [`layout`], reporting after every simulation step.
pub fn layout_with_progress<F>(
    stats: &Stats,
    options: &RenderOptions,
    on_progress: F,
) -> Result<Graph, BundleGraphError>
where
    F: FnMut(Progress),
{
    let graph = Graph::from_stats(stats, options.physics.clone(), options.seed)?;
    Ok(settle(graph, options, on_progress))
}

/// Continue a saved layout: the snapshot's positions and speeds are the
/// starting point, and the step budget applies again.
pub fn resume(snapshot: &GraphSnapshot, options: &RenderOptions) -> Result<Graph, BundleGraphError> {
    resume_with_progress(snapshot, options, |_| {})
}

pub fn resume_with_progress<F>(
    snapshot: &GraphSnapshot,
    options: &RenderOptions,
    on_progress: F,
) -> Result<Graph, BundleGraphError>
where
    F: FnMut(Progress),
{
    let graph = Graph::load(snapshot, options.physics.clone(), options.seed)?;
    Ok(settle(graph, options, on_progress))
}

fn settle<F>(mut graph: Graph, options: &RenderOptions, on_progress: F) -> Graph
where
    F: FnMut(Progress),
{
    graph.converge(options.step_budget(), on_progress);
    graph.normalize(options.viewport());
    graph
}

/// Lay out `stats` and return the complete SVG document.
pub fn render_svg(stats: &Stats, options: &RenderOptions) -> Result<String, BundleGraphError> {
    let mut graph = layout(stats, options)?;
    let mut out = Vec::new();
    write_svg(&mut graph, options, &mut out)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Stream the SVG document of an already laid out graph into `out`.
pub fn write_svg<W: Write>(
    graph: &mut Graph,
    options: &RenderOptions,
    out: &mut W,
) -> Result<(), BundleGraphError> {
    render_document(graph, options, out)?;
    Ok(())
}
