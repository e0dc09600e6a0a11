//! Device-independent canvas front end.
//!
//! A canvas is a [`CanvasDriver`] plus the [`CanvasState`] it reads. The only
//! driver shipped here is [`PptxCanvas`], which records each page as a slide.

pub mod driver;
pub mod metrics;
pub mod pptx;
pub mod state;

pub use driver::{CanvasDriver, Capabilities, ClipMode, ImageRect, PolyMode};
pub use metrics::{ApproximateMetrics, FontDim, TextMetrics};
pub use pptx::{CreationParams, PptxCanvas};
pub use state::{CanvasState, Font, FontStyle, TextAlignment};
