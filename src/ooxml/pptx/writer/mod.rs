//! Streaming presentation writer.
//!
//! A [`Document`] owns the staging tree and the open [`SlideStream`]; shapes
//! are written through a [`ShapeWriter`] borrowed from it, and raster data
//! becomes media parts through a [`MediaSink`].

pub mod fill;
pub mod media;
pub mod pres;
pub mod relmap;
pub mod shape;
pub mod slide;

#[cfg(test)]
mod tests;

pub use fill::{BackOpacity, Dash, FillResolver, FillSpec, PatternImage, ResolvedFill, StippleImage, Stroke};
pub use media::{MediaSink, PixelLayout, PngEncoder, Raster, RasterEncoder};
pub use pres::{Document, DocumentState};
pub use relmap::{IdAllocator, MediaSlot};
pub use shape::{CustomGeometry, Paint, PathCommand, PathPaint, PresetShape, ShapeWriter, TextRun};
pub use slide::SlideStream;
