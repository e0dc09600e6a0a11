//! Color and stroke style types shared by the canvas layer and the writers.

mod color;
mod line;

pub use color::Color;
pub use line::{HatchStyle, InteriorStyle, LineStyle};
