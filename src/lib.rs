//! canvas-pptx - A device-independent vector canvas with a PowerPoint export
//! driver
//!
//! Drawing primitives (lines, rectangles, filled boxes, arcs, pies, chords,
//! polygons, Bézier chains, composite paths, styled text, pixels and raster
//! images) are translated into DrawingML shapes and streamed into an OOXML
//! presentation package, one slide per page, which is finally archived into a
//! single `.pptx` file.
//!
//! # Features
//!
//! - **Canvas driver**: [`canvas::PptxCanvas`] implements [`canvas::CanvasDriver`]
//! - **Streaming slides**: shapes are written as they are drawn, nothing is
//!   kept in memory once emitted
//! - **Pattern and stipple fills**: rendered into PNG tiles stored as media
//! - **Crash-safe staging**: the staging tree lives in a temporary directory
//!   that is removed on error, abort or drop
//! - **YAML options**: [`config::ExportOptions`] can be loaded with `serde`
//!
//! # Example - Drawing through the canvas
//!
//! ```no_run
//! use canvas_pptx::canvas::{CanvasDriver, PptxCanvas, PolyMode};
//! use canvas_pptx::common::Color;
//! use canvas_pptx::config::ExportOptions;
//! use canvas_pptx::geometry::Point;
//! use canvas_pptx::ooxml::pptx::ZipArchiver;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // 100 x 100 mm page at 4 pixels per millimetre
//! let mut canvas = PptxCanvas::create("drawing.pptx 100x100 4", &ExportOptions::default())?;
//!
//! canvas.line(0, 0, 399, 399)?;
//! canvas.state_mut().foreground = Color::rgb(200, 30, 30);
//! canvas.fill_box(40, 120, 40, 120)?;
//! canvas.poly(
//!     PolyMode::ClosedLines,
//!     &[Point::new(200, 200), Point::new(300, 200), Point::new(250, 300)],
//! )?;
//!
//! // Start a second slide
//! canvas.flush()?;
//! canvas.text(20, 20, b"Second page")?;
//!
//! canvas.finish(&ZipArchiver)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Writing shapes directly
//!
//! ```no_run
//! use canvas_pptx::common::Color;
//! use canvas_pptx::config::ExportOptions;
//! use canvas_pptx::geometry::Point;
//! use canvas_pptx::ooxml::pptx::ZipArchiver;
//! use canvas_pptx::ooxml::pptx::writer::{CustomGeometry, Document, FillSpec, Paint, Stroke};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut doc = Document::create(270.0, 195.0, 1200, 866, &ExportOptions::default())?;
//! assert_eq!(doc.scale().x(), 8100);
//!
//! let paint = Paint::fill_and_stroke(FillSpec::Solid(Color::WHITE), Stroke::solid(2, Color::BLACK));
//! doc.shape_writer()?
//!     .custom_shape(&CustomGeometry::rect(100, 300, 100, 200), &paint)?;
//! doc.shape_writer()?
//!     .custom_shape(&CustomGeometry::line(Point::new(0, 0), Point::new(50, 50)), &Paint::stroke(Stroke::solid(1, Color::BLACK)))?;
//!
//! doc.finalize()?;
//! doc.package(std::path::Path::new("shapes.pptx"), &ZipArchiver)?;
//! # Ok(())
//! # }
//! ```

/// Canvas front end and the PowerPoint driver
pub mod canvas;

/// Colours, line styles, units and text encoding shared by every layer
pub mod common;

/// Export options
pub mod config;

/// Pixel-space geometry: arcs, bounding boxes, dashes and paths
pub mod geometry;

/// OOXML presentation writer and packaging
pub mod ooxml;

// Re-export commonly used types for convenience
pub use canvas::{CanvasDriver, CanvasState, PptxCanvas};
pub use config::{ExportOptions, StrokeAlphaPolicy};
pub use ooxml::{ExportError, Result};
