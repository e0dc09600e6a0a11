//! Common types and utilities shared by the geometry engine, the canvas layer
//! and the OOXML writers.

pub mod encoding;
pub mod style;
pub mod unit;
pub mod xml;

// Re-exports for convenience
pub use encoding::TextEncoder;
pub use style::{Color, HatchStyle, InteriorStyle, LineStyle};
pub use unit::ScaleFactors;
