//! Canvas driver that records primitives as PowerPoint slides.
//!
//! Every flush starts a new slide. Nothing is readable until
//! [`PptxCanvas::finish`] has packaged the staging tree into the target file.
//!
//! ```rust,no_run
//! use canvas_pptx::canvas::{CanvasDriver, PptxCanvas};
//! use canvas_pptx::config::ExportOptions;
//! use canvas_pptx::ooxml::pptx::ZipArchiver;
//!
//! # fn main() -> canvas_pptx::ooxml::Result<()> {
//! let mut canvas = PptxCanvas::create("\"out.pptx\" 100x100 4", &ExportOptions::default())?;
//! canvas.line(0, 0, 10, 10)?;
//! canvas.fill_box(20, 40, 20, 40)?;
//! canvas.finish(&ZipArchiver)?;
//! # Ok(())
//! # }
//! ```

use super::driver::{CanvasDriver, Capabilities, ClipMode, ImageRect, PolyMode};
use super::metrics::{ApproximateMetrics, TextMetrics, point_size};
use super::state::{CanvasState, FontStyle, TextAlignment};
use crate::common::{Color, TextEncoder};
use crate::config::ExportOptions;
use crate::geometry::{EllipticArc, Path, Point};
use crate::ooxml::error::{ExportError, Result};
use crate::ooxml::pptx::package::Archiver;
use crate::ooxml::pptx::writer::{
    CustomGeometry, Document, Paint, PixelLayout, PresetShape, Raster, TextRun,
};
use std::path::{Path as FsPath, PathBuf};
use tracing::debug;

/// Page width used when the creation string gives none, in millimetres.
pub const DEFAULT_WIDTH_MM: f64 = 254.0;
/// Page height used when the creation string gives none, in millimetres.
pub const DEFAULT_HEIGHT_MM: f64 = 190.5;
/// Resolution used when the creation string gives none, in pixels per
/// millimetre (96 dpi).
pub const DEFAULT_RESOLUTION: f64 = 3.78;

/// Parsed creation string: `<file> [<width>x<height> [<resolution>]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreationParams {
    pub target: PathBuf,
    pub width_mm: f64,
    pub height_mm: f64,
    /// Pixels per millimetre
    pub resolution: f64,
}

impl CreationParams {
    /// Parse a creation string. The file name may be double-quoted to hold
    /// spaces.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use canvas_pptx::canvas::CreationParams;
    ///
    /// let params = CreationParams::parse("\"my slides.pptx\" 270x195 4.4").unwrap();
    /// assert_eq!(params.target.to_str(), Some("my slides.pptx"));
    /// assert_eq!(params.pixel_size(), (1188, 858));
    /// ```
    pub fn parse(data: &str) -> Result<Self> {
        let data = data.trim_start();
        let (target, rest) = match data.strip_prefix('"') {
            Some(quoted) => {
                let end = quoted
                    .find('"')
                    .ok_or_else(|| ExportError::Config(format!("unterminated file name in {:?}", data)))?;
                (&quoted[..end], &quoted[end + 1..])
            },
            None => data.split_once(char::is_whitespace).unwrap_or((data, "")),
        };
        if target.is_empty() {
            return Err(ExportError::Config("creation string has no file name".to_string()));
        }

        let mut params = Self {
            target: PathBuf::from(target),
            width_mm: DEFAULT_WIDTH_MM,
            height_mm: DEFAULT_HEIGHT_MM,
            resolution: DEFAULT_RESOLUTION,
        };

        let mut fields = rest.split_whitespace();
        if let Some(size) = fields.next() {
            let (w, h) = size
                .split_once('x')
                .ok_or_else(|| ExportError::Config(format!("page size {:?} is not <width>x<height>", size)))?;
            params.width_mm = parse_number(w)?;
            params.height_mm = parse_number(h)?;
        }
        if let Some(res) = fields.next() {
            params.resolution = parse_number(res)?;
        }

        if !(params.width_mm > 0.0 && params.height_mm > 0.0 && params.resolution > 0.0) {
            return Err(ExportError::Config(format!(
                "page {}x{} mm at {} px/mm is empty",
                params.width_mm, params.height_mm, params.resolution
            )));
        }
        Ok(params)
    }

    /// Page size in pixels, truncated.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.width_mm * self.resolution) as u32,
            (self.height_mm * self.resolution) as u32,
        )
    }
}

fn parse_number(field: &str) -> Result<f64> {
    field
        .parse()
        .map_err(|_| ExportError::Config(format!("{:?} is not a number", field)))
}

/// Vertical shift applied to a text box for `alignment`.
///
/// Baseline alignments move up by twice the descent, south alignments by the
/// full height and north alignments down by it.
fn anchor_shift(alignment: TextAlignment, height: i32, descent: i32) -> i32 {
    if alignment.is_baseline() {
        -2 * descent
    } else if alignment.is_south() {
        -2 * (height / 2)
    } else if alignment.is_north() {
        2 * (height / 2)
    } else {
        0
    }
}

/// Crop `rect` out of a bottom-up source and return it top-down.
fn crop_flipped<F>(width: u32, height: u32, rect: &ImageRect, layout: PixelLayout, sample: F) -> Result<Raster>
where
    F: Fn(usize) -> Color,
{
    rect.validate(width, height)?;
    Raster::from_fn(rect.crop_width(), rect.crop_height(), layout, |col, row| {
        let src_row = (rect.ymax - row) as usize;
        sample(src_row * width as usize + (rect.xmin + col) as usize)
    })
}

fn check_planes(width: u32, height: u32, planes: &[&[u8]]) -> Result<()> {
    let needed = width as usize * height as usize;
    match planes.iter().find(|plane| plane.len() < needed) {
        Some(plane) => Err(ExportError::InvalidGeometry(format!(
            "{}x{} image needs {} bytes per plane, got {}",
            width,
            height,
            needed,
            plane.len()
        ))),
        None => Ok(()),
    }
}

/// PowerPoint canvas driver.
pub struct PptxCanvas {
    document: Document,
    params: CreationParams,
    state: CanvasState,
    text: TextEncoder,
    metrics: Box<dyn TextMetrics + Send>,
}

impl std::fmt::Debug for PptxCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PptxCanvas")
            .field("target", &self.params.target)
            .field("document", &self.document)
            .finish_non_exhaustive()
    }
}

impl PptxCanvas {
    /// Features of the driver.
    pub const CAPABILITIES: Capabilities = Capabilities::all().difference(
        Capabilities::CLEAR
            .union(Capabilities::GET_IMAGE_RGB)
            .union(Capabilities::IMAGE_SERVER)
            .union(Capabilities::PLAY)
            .union(Capabilities::PALETTE)
            .union(Capabilities::Y_AXIS)
            .union(Capabilities::REGION)
            .union(Capabilities::WRITE_MODE)
            .union(Capabilities::FONT_DIM)
            .union(Capabilities::TEXT_SIZE),
    );

    /// Create a canvas from a creation string.
    pub fn create(data: &str, options: &ExportOptions) -> Result<Self> {
        Self::new(CreationParams::parse(data)?, options)
    }

    pub fn new(params: CreationParams, options: &ExportOptions) -> Result<Self> {
        let metrics = Box::new(ApproximateMetrics::new(params.resolution));
        Self::with_metrics(params, options, metrics)
    }

    /// Create a canvas that measures text with `metrics`.
    pub fn with_metrics(
        params: CreationParams,
        options: &ExportOptions,
        metrics: Box<dyn TextMetrics + Send>,
    ) -> Result<Self> {
        let (width_px, height_px) = params.pixel_size();
        let document = Document::create(params.width_mm, params.height_mm, width_px, height_px, options)?;
        debug!(
            path = %params.target.display(),
            width_px,
            height_px,
            resolution = params.resolution,
            "created pptx canvas"
        );

        Ok(Self {
            document,
            params,
            state: CanvasState::default(),
            text: options.text_encoder()?,
            metrics,
        })
    }

    pub fn params(&self) -> &CreationParams {
        &self.params
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn target(&self) -> &FsPath {
        &self.params.target
    }

    /// Treat text bytes as UTF-8.
    pub fn set_utf8_mode(&mut self, utf8_mode: bool) {
        self.text.set_utf8_mode(utf8_mode);
    }

    pub fn utf8_mode(&self) -> bool {
        self.text.utf8_mode()
    }

    /// Finalize the document and package it into the target file.
    pub fn finish(mut self, archiver: &dyn Archiver) -> Result<PathBuf> {
        self.document.finalize()?;
        self.document.package(&self.params.target, archiver)?;
        Ok(self.params.target)
    }

    /// Discard everything drawn so far.
    pub fn abort(mut self) {
        self.document.abort();
    }

    fn outline(&mut self, geometry: &CustomGeometry) -> Result<()> {
        let paint = Paint::stroke(self.state.stroke());
        self.document.shape_writer()?.custom_shape(geometry, &paint)?;
        Ok(())
    }

    fn filled_outline(&mut self, geometry: &CustomGeometry) -> Result<()> {
        let paint = Paint::fill_and_stroke(self.state.fill(), self.state.stroke());
        self.document.shape_writer()?.custom_shape(geometry, &paint)?;
        Ok(())
    }

    fn preset(&mut self, shape: PresetShape, arc: &EllipticArc, filled: bool) -> Result<()> {
        let paint = if filled {
            Paint::fill_and_stroke(self.state.fill(), self.state.stroke())
        } else {
            Paint::stroke(self.state.stroke())
        };
        self.document
            .shape_writer()?
            .preset_shape(shape, arc, self.state.invert_y, &paint)?;
        Ok(())
    }

    fn picture(&mut self, raster: &Raster, rect: &ImageRect) -> Result<()> {
        self.document
            .shape_writer()?
            .picture(raster, Point::new(rect.x, rect.y), rect.width, rect.height)?;
        Ok(())
    }
}

impl CanvasDriver for PptxCanvas {
    fn capabilities(&self) -> Capabilities {
        Self::CAPABILITIES
    }

    fn state(&self) -> &CanvasState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut CanvasState {
        &mut self.state
    }

    fn flush(&mut self) -> Result<()> {
        self.document.close_slide()?;
        self.document.open_slide()
    }

    fn clip(&mut self, mode: ClipMode) -> ClipMode {
        mode
    }

    fn pixel(&mut self, x: i32, y: i32, color: Color) -> Result<()> {
        self.document.shape_writer()?.pixel(Point::new(x, y), color)?;
        Ok(())
    }

    fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> Result<()> {
        self.outline(&CustomGeometry::line(Point::new(x1, y1), Point::new(x2, y2)))
    }

    fn rect(&mut self, xmin: i32, xmax: i32, ymin: i32, ymax: i32) -> Result<()> {
        self.outline(&CustomGeometry::rect(xmin, xmax, ymin, ymax))
    }

    fn fill_box(&mut self, xmin: i32, xmax: i32, ymin: i32, ymax: i32) -> Result<()> {
        self.filled_outline(&CustomGeometry::rect(xmin, xmax, ymin, ymax))
    }

    fn arc(&mut self, arc: &EllipticArc) -> Result<()> {
        self.preset(PresetShape::Arc, arc, false)
    }

    fn sector(&mut self, arc: &EllipticArc) -> Result<()> {
        self.preset(PresetShape::Pie, arc, true)
    }

    fn chord(&mut self, arc: &EllipticArc) -> Result<()> {
        self.preset(PresetShape::Chord, arc, true)
    }

    fn poly(&mut self, mode: PolyMode, points: &[Point]) -> Result<()> {
        match mode {
            PolyMode::Clip => Ok(()),
            PolyMode::ClosedLines | PolyMode::OpenLines => {
                let geometry = CustomGeometry::polyline(points, mode == PolyMode::ClosedLines)?;
                self.outline(&geometry)
            },
            PolyMode::Bezier => self.outline(&CustomGeometry::bezier(points)?),
            PolyMode::Fill => {
                let geometry = CustomGeometry::polyline(points, false)?;
                let paint = Paint::fill(self.state.fill());
                self.document.shape_writer()?.custom_shape(&geometry, &paint)?;
                Ok(())
            },
        }
    }

    fn path(&mut self, path: &Path) -> Result<()> {
        let stroke = self.state.stroke();
        self.document
            .shape_writer()?
            .path(path, self.state.invert_y, self.state.fill(), &stroke)?;
        Ok(())
    }

    fn text(&mut self, x: i32, y: i32, text: &[u8]) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let text = self.text.normalize(text);
        let font = &self.state.font;
        let alignment = self.state.text_alignment;

        let bbox = self.metrics.text_box(font, alignment, Point::new(x, y), &text);
        let dim = self.metrics.font_dim(font);
        let (width, height) = (bbox.width(), bbox.height());
        let origin = Point::new(bbox.xmin, bbox.ymin + anchor_shift(alignment, height, dim.descent));

        let run = TextRun {
            origin,
            width,
            height,
            rotation: -self.state.text_orientation,
            typeface: &font.typeface,
            size: point_size(font.size, self.params.resolution),
            bold: font.style.contains(FontStyle::BOLD),
            italic: font.style.contains(FontStyle::ITALIC),
            underline: font.style.contains(FontStyle::UNDERLINE),
            strikeout: font.style.contains(FontStyle::STRIKEOUT),
            color: self.state.foreground,
            text: &text,
        };
        self.document.shape_writer()?.text(&run)?;
        Ok(())
    }

    fn font(&mut self, typeface: &str, style: FontStyle, size: i32) -> bool {
        self.state.set_font(typeface, style, size);
        true
    }

    fn put_image_map(
        &mut self,
        image_width: u32,
        image_height: u32,
        index: &[u8],
        palette: &[Color],
        rect: &ImageRect,
    ) -> Result<()> {
        check_planes(image_width, image_height, &[index])?;
        let pixels = image_width as usize * image_height as usize;
        if let Some(bad) = index[..pixels].iter().find(|&&i| i as usize >= palette.len()) {
            return Err(ExportError::InvalidGeometry(format!(
                "colour index {} is outside a palette of {}",
                bad,
                palette.len()
            )));
        }

        let raster = crop_flipped(image_width, image_height, rect, PixelLayout::Rgb, |i| {
            palette[index[i] as usize]
        })?;
        self.picture(&raster, rect)
    }

    fn put_image_rgb(&mut self, image_width: u32, image_height: u32, planes: [&[u8]; 3], rect: &ImageRect) -> Result<()> {
        check_planes(image_width, image_height, &planes)?;
        let [r, g, b] = planes;
        let raster = crop_flipped(image_width, image_height, rect, PixelLayout::Rgb, |i| {
            Color::rgb(r[i], g[i], b[i])
        })?;
        self.picture(&raster, rect)
    }

    fn put_image_rgba(
        &mut self,
        image_width: u32,
        image_height: u32,
        planes: [&[u8]; 4],
        rect: &ImageRect,
    ) -> Result<()> {
        check_planes(image_width, image_height, &planes)?;
        let [r, g, b, a] = planes;
        let raster = crop_flipped(image_width, image_height, rect, PixelLayout::Rgba, |i| {
            Color::rgba(r[i], g[i], b[i], a[i])
        })?;
        self.picture(&raster, rect)
    }
}
