//! Backend driver interface of the canvas.
//!
//! The canvas front end keeps no output of its own; every primitive is handed
//! to a [`CanvasDriver`] together with the [`CanvasState`] it owns. Coordinates
//! are device pixels and have already been mapped to the device orientation.
use super::state::{CanvasState, FontStyle};
use crate::common::Color;
use crate::geometry::{EllipticArc, Path, Point};
use crate::ooxml::error::{ExportError, Result};
use bitflags::bitflags;

bitflags! {
    /// Features a driver implements.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        const FLUSH = 1 << 0;
        const CLEAR = 1 << 1;
        const PLAY = 1 << 2;
        /// Driver handles y axis inversion itself
        const Y_AXIS = 1 << 3;
        const CLIP_AREA = 1 << 4;
        const CLIP_POLY = 1 << 5;
        const REGION = 1 << 6;
        const RECT = 1 << 7;
        const CHORD = 1 << 8;
        const IMAGE_RGB = 1 << 9;
        const IMAGE_RGBA = 1 << 10;
        const IMAGE_MAP = 1 << 11;
        const GET_IMAGE_RGB = 1 << 12;
        const IMAGE_SERVER = 1 << 13;
        const BACKGROUND = 1 << 14;
        const BACK_OPACITY = 1 << 15;
        const WRITE_MODE = 1 << 16;
        const LINE_STYLE = 1 << 17;
        const LINE_WIDTH = 1 << 18;
        const FLOAT_PRIMITIVES = 1 << 19;
        const HATCH = 1 << 20;
        const STIPPLE = 1 << 21;
        const PATTERN = 1 << 22;
        const FONT = 1 << 23;
        const FONT_DIM = 1 << 24;
        const TEXT_SIZE = 1 << 25;
        const TEXT_ORIENTATION = 1 << 26;
        const PALETTE = 1 << 27;
        const LINE_CAP = 1 << 28;
        const LINE_JOIN = 1 << 29;
        const PATH = 1 << 30;
        const BEZIER = 1 << 31;
    }
}

/// How the points of [`CanvasDriver::poly`] are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolyMode {
    /// Outline returning to the first point
    ClosedLines,
    OpenLines,
    /// Start point followed by `(control, control, end)` groups
    Bezier,
    /// Filled polygon without outline
    Fill,
    /// Clipping polygon
    Clip,
}

/// Clipping mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipMode {
    #[default]
    Off,
    Area,
    Polygon,
    Region,
    Path,
}

/// Where an image goes and which part of it is drawn.
///
/// `xmin..=xmax` and `ymin..=ymax` select the source sub-rectangle; it is
/// stretched over the `width` x `height` destination box at `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub xmin: u32,
    pub xmax: u32,
    pub ymin: u32,
    pub ymax: u32,
}

impl ImageRect {
    /// Whole `image_width` x `image_height` image drawn at its own size.
    pub fn whole(x: i32, y: i32, image_width: u32, image_height: u32) -> Self {
        Self {
            x,
            y,
            width: image_width as i32,
            height: image_height as i32,
            xmin: 0,
            xmax: image_width.saturating_sub(1),
            ymin: 0,
            ymax: image_height.saturating_sub(1),
        }
    }

    /// Check the sub-rectangle against the source size.
    pub fn validate(&self, image_width: u32, image_height: u32) -> Result<()> {
        if self.xmin > self.xmax || self.ymin > self.ymax || self.xmax >= image_width || self.ymax >= image_height {
            return Err(ExportError::InvalidGeometry(format!(
                "sub-rectangle {}..={} x {}..={} is outside a {}x{} image",
                self.xmin, self.xmax, self.ymin, self.ymax, image_width, image_height
            )));
        }
        Ok(())
    }

    pub fn crop_width(&self) -> u32 {
        self.xmax - self.xmin + 1
    }

    pub fn crop_height(&self) -> u32 {
        self.ymax - self.ymin + 1
    }
}

/// A canvas backend.
///
/// Raster sources handed to the `put_image_*` methods are planar, one byte
/// per pixel per plane, rows bottom to top.
pub trait CanvasDriver {
    fn capabilities(&self) -> Capabilities;

    /// Drawing state read by every primitive.
    fn state(&self) -> &CanvasState;

    fn state_mut(&mut self) -> &mut CanvasState;

    /// Finish the current page and start a new one.
    fn flush(&mut self) -> Result<()>;

    /// Select a clipping mode, returning the mode in effect.
    fn clip(&mut self, mode: ClipMode) -> ClipMode;

    fn pixel(&mut self, x: i32, y: i32, color: Color) -> Result<()>;

    fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> Result<()>;

    /// Rectangle outline.
    fn rect(&mut self, xmin: i32, xmax: i32, ymin: i32, ymax: i32) -> Result<()>;

    /// Filled rectangle.
    fn fill_box(&mut self, xmin: i32, xmax: i32, ymin: i32, ymax: i32) -> Result<()>;

    fn arc(&mut self, arc: &EllipticArc) -> Result<()>;

    /// Filled pie slice.
    fn sector(&mut self, arc: &EllipticArc) -> Result<()>;

    /// Filled region between an arc and its chord.
    fn chord(&mut self, arc: &EllipticArc) -> Result<()>;

    fn poly(&mut self, mode: PolyMode, points: &[Point]) -> Result<()>;

    fn path(&mut self, path: &Path) -> Result<()>;

    /// Draw `text` at `(x, y)`. The bytes are UTF-8 or the driver's legacy
    /// encoding.
    fn text(&mut self, x: i32, y: i32, text: &[u8]) -> Result<()>;

    /// Select a font, returning whether the driver accepted it.
    fn font(&mut self, typeface: &str, style: FontStyle, size: i32) -> bool;

    /// Palette image: one index plane looked up in `palette`.
    fn put_image_map(
        &mut self,
        image_width: u32,
        image_height: u32,
        index: &[u8],
        palette: &[Color],
        rect: &ImageRect,
    ) -> Result<()>;

    fn put_image_rgb(&mut self, image_width: u32, image_height: u32, planes: [&[u8]; 3], rect: &ImageRect) -> Result<()>;

    fn put_image_rgba(&mut self, image_width: u32, image_height: u32, planes: [&[u8]; 4], rect: &ImageRect)
    -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_image_rect() {
        let rect = ImageRect::whole(5, 6, 4, 3);
        assert_eq!((rect.xmax, rect.ymax), (3, 2));
        assert_eq!((rect.crop_width(), rect.crop_height()), (4, 3));
        assert!(rect.validate(4, 3).is_ok());
        assert!(rect.validate(3, 3).is_err());
    }

    #[test]
    fn test_inverted_rect_rejected() {
        let rect = ImageRect {
            xmin: 2,
            xmax: 1,
            ..ImageRect::whole(0, 0, 4, 4)
        };
        assert!(matches!(rect.validate(4, 4), Err(ExportError::InvalidGeometry(_))));
    }
}
