//! Text measurement.
//!
//! Drivers that do not rasterise text still need the size of a text box to
//! place it. A font engine plugs in through [`TextMetrics`];
//! [`ApproximateMetrics`] stands in when there is none.

use super::state::{Font, TextAlignment};
use crate::geometry::{BoundingBox, Point};

/// Vertical metrics of a font, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontDim {
    pub max_width: i32,
    pub line_height: i32,
    pub ascent: i32,
    pub descent: i32,
}

/// Size in points of a font size (points when positive, pixels at
/// `resolution` pixels per millimetre when negative), at least 1.
pub fn point_size(size: i32, resolution: f64) -> i32 {
    if size < 0 {
        let pixels = -(size as f64);
        (pixels * 72.0 / (25.4 * resolution)).round().max(1.0) as i32
    } else {
        size.max(1)
    }
}

/// Measures text for a canvas.
pub trait TextMetrics {
    /// Metrics of `font`.
    fn font_dim(&self, font: &Font) -> FontDim;

    /// Box of `text` drawn unrotated at `at` with `alignment`, in the y-up
    /// convention of the canvas.
    fn text_box(&self, font: &Font, alignment: TextAlignment, at: Point, text: &str) -> BoundingBox;
}

/// Fixed-proportion metrics derived from the font size alone.
///
/// Every character is half the line height wide and the ascent is four
/// fifths of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximateMetrics {
    /// Device resolution in pixels per millimetre
    resolution: f64,
}

impl ApproximateMetrics {
    pub fn new(resolution: f64) -> Self {
        Self { resolution }
    }

    /// Line height in pixels of a font size (points when positive, pixels
    /// when negative).
    pub fn pixel_size(&self, size: i32) -> i32 {
        if size < 0 {
            size.saturating_neg()
        } else {
            (size as f64 * 25.4 / 72.0 * self.resolution).round().max(1.0) as i32
        }
    }
}

impl TextMetrics for ApproximateMetrics {
    fn font_dim(&self, font: &Font) -> FontDim {
        let line_height = self.pixel_size(font.size).max(1);
        let ascent = line_height * 4 / 5;
        FontDim {
            max_width: (line_height * 3 / 5).max(1),
            line_height,
            ascent,
            descent: line_height - ascent,
        }
    }

    fn text_box(&self, font: &Font, alignment: TextAlignment, at: Point, text: &str) -> BoundingBox {
        let dim = self.font_dim(font);
        let width = (text.chars().count() as i32 * dim.line_height / 2).max(1);
        let height = dim.line_height;

        let xmin = if alignment.is_west() {
            at.x
        } else if alignment.is_east() {
            at.x - width + 1
        } else {
            at.x - width / 2
        };
        let ymin = if alignment.is_baseline() {
            at.y - dim.descent
        } else if alignment.is_south() {
            at.y
        } else if alignment.is_north() {
            at.y - height + 1
        } else {
            at.y - height / 2
        };

        BoundingBox::from_corners(
            Point::new(xmin, ymin),
            Point::new(xmin + width - 1, ymin + height - 1),
        )
    }
}
