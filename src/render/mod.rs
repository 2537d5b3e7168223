//! Scene projection, colouring and SVG output.

mod assets;
mod color;
mod scene;
mod sink;
mod svg;

pub use color::{
    ColorAllocator, ColorChannel, ColorChannels, ColorsMap, Rgb, default_palette, package_name,
};
pub use scene::{Circle, Line, LineKind, Relation, SceneBuilder};
pub use sink::{CircleGeometry, Frame, LineGeometry, LiveScene, SceneSink};
pub use svg::{
    SNAPSHOT_ELEMENT_ID, SvgEmitter, embedded_snapshot, escape_xml, render_document, unescape_xml,
    write_document,
};
