/// Fill and stroke resolution.
///
/// A canvas interior style turns into one of four DrawingML fills. Pattern
/// and stipple interiors have no DrawingML equivalent, so they are rendered
/// into a raster tile that becomes a media part of the open slide.
use crate::common::unit::alpha_to_pct;
use crate::common::{Color, HatchStyle, LineStyle};
use crate::geometry::{DashStop, normalize_dashes};
use crate::ooxml::error::{ExportError, Result};
use smallvec::SmallVec;
use std::fmt::Write as FmtWrite;

use super::media::{MediaSink, PixelLayout, Raster};

/// Whether the clear bits of a stipple are painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackOpacity {
    /// Clear bits take the background colour
    Opaque,
    /// Clear bits are fully transparent
    #[default]
    Transparent,
}

/// A tile of packed canvas colours (`0xTTRRGGBB`), rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternImage {
    width: u32,
    height: u32,
    colors: Vec<u32>,
}

impl PatternImage {
    pub fn new(width: u32, height: u32, colors: Vec<u32>) -> Result<Self> {
        if width == 0 || height == 0 || colors.len() != width as usize * height as usize {
            return Err(ExportError::InvalidGeometry(format!(
                "{}x{} pattern needs {} colours, got {}",
                width,
                height,
                width as usize * height as usize,
                colors.len()
            )));
        }
        Ok(Self {
            width,
            height,
            colors,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Opaque RGB tile; the transparency byte of each colour is dropped.
    pub fn to_raster(&self) -> Result<Raster> {
        Raster::from_fn(self.width, self.height, PixelLayout::Rgb, |col, row| {
            Color::from_packed(self.colors[(row * self.width + col) as usize]).with_alpha(255)
        })
    }
}

/// A bit mask tile, one byte per pixel (non-zero is set), stored bottom-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StippleImage {
    width: u32,
    height: u32,
    bits: Vec<u8>,
}

impl StippleImage {
    pub fn new(width: u32, height: u32, bits: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 || bits.len() != width as usize * height as usize {
            return Err(ExportError::InvalidGeometry(format!(
                "{}x{} stipple needs {} bits, got {}",
                width,
                height,
                width as usize * height as usize,
                bits.len()
            )));
        }
        Ok(Self { width, height, bits })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether bit `(col, row)` is set, `row` counted from the bottom.
    pub fn is_set(&self, col: u32, row: u32) -> bool {
        self.bits[(row * self.width + col) as usize] != 0
    }

    /// RGBA tile with stipple row `r` at output row `height - r - 1`.
    ///
    /// # Arguments
    /// * `fg` - Colour of set bits, always opaque
    /// * `bg` - Colour of clear bits
    /// * `back_opacity` - Whether clear bits are painted at all
    pub fn to_raster(&self, fg: Color, bg: Color, back_opacity: BackOpacity) -> Result<Raster> {
        let fg = fg.with_alpha(255);
        let bg = match back_opacity {
            BackOpacity::Opaque => bg.with_alpha(255),
            BackOpacity::Transparent => bg.with_alpha(0),
        };
        Raster::from_fn(self.width, self.height, PixelLayout::Rgba, |col, out_row| {
            if self.is_set(col, self.height - out_row - 1) {
                fg
            } else {
                bg
            }
        })
    }
}

/// Interior of a shape as the canvas describes it.
#[derive(Debug, Clone, Copy)]
pub enum FillSpec<'a> {
    Solid(Color),
    Hatch {
        style: HatchStyle,
        fg: Color,
        bg: Color,
    },
    Pattern(&'a PatternImage),
    Stipple {
        image: &'a StippleImage,
        fg: Color,
        bg: Color,
        back_opacity: BackOpacity,
    },
    Hollow,
}

/// A fill ready to be written into `p:spPr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedFill {
    Solid(Color),
    Pattern {
        preset: &'static str,
        fg: Color,
        bg: Color,
    },
    /// Tiled media part referenced by relationship id
    Blip { rel_id: u32 },
    None,
}

impl ResolvedFill {
    /// Whether the fill paints anything.
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn write_xml(&self, xml: &mut String) -> Result<()> {
        match self {
            Self::Solid(color) => write_solid_fill(xml, *color)?,
            Self::Pattern { preset, fg, bg } => {
                write!(xml, r#"<a:pattFill prst="{}"><a:fgClr>"#, preset)?;
                write_srgb(xml, *fg)?;
                xml.push_str("</a:fgClr><a:bgClr>");
                write_srgb(xml, bg.with_alpha(0))?;
                xml.push_str("</a:bgClr></a:pattFill>");
            },
            Self::Blip { rel_id } => {
                write!(
                    xml,
                    r#"<a:blipFill dpi="0" rotWithShape="1"><a:blip r:embed="rId{}"/><a:srcRect/>"#,
                    rel_id
                )?;
                xml.push_str(r#"<a:tile tx="0" ty="0" sx="100000" sy="100000" flip="none" algn="tl"/>"#);
                xml.push_str("</a:blipFill>");
            },
            Self::None => xml.push_str("<a:noFill/>"),
        }
        Ok(())
    }
}

/// Write `<a:srgbClr>` with its alpha.
pub(crate) fn write_srgb(xml: &mut String, color: Color) -> Result<()> {
    write!(
        xml,
        r#"<a:srgbClr val="{}"><a:alpha val="{}"/></a:srgbClr>"#,
        color.to_hex(),
        alpha_to_pct(color.a)
    )?;
    Ok(())
}

pub(crate) fn write_solid_fill(xml: &mut String, color: Color) -> Result<()> {
    xml.push_str("<a:solidFill>");
    write_srgb(xml, color)?;
    xml.push_str("</a:solidFill>");
    Ok(())
}

/// Turns [`FillSpec`]s into [`ResolvedFill`]s.
pub struct FillResolver;

impl FillResolver {
    /// Resolve `fill`, storing a raster tile in `media` when one is needed.
    ///
    /// If storing the tile fails, no media slot is consumed.
    pub fn resolve(fill: &FillSpec<'_>, media: &mut dyn MediaSink) -> Result<ResolvedFill> {
        let resolved = match *fill {
            FillSpec::Solid(color) => ResolvedFill::Solid(color),
            FillSpec::Hatch { style, fg, bg } => ResolvedFill::Pattern {
                preset: style.preset(),
                fg,
                bg,
            },
            FillSpec::Pattern(image) => {
                let slot = media.store(&image.to_raster()?)?;
                ResolvedFill::Blip {
                    rel_id: slot.rel_id,
                }
            },
            FillSpec::Stipple {
                image,
                fg,
                bg,
                back_opacity,
            } => {
                let slot = media.store(&image.to_raster(fg, bg, back_opacity)?)?;
                ResolvedFill::Blip {
                    rel_id: slot.rel_id,
                }
            },
            FillSpec::Hollow => ResolvedFill::None,
        };
        Ok(resolved)
    }
}

/// Dash of a stroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dash {
    /// `a:prstDash` value
    Preset(&'static str),
    /// Width-relative stops for `a:custDash`
    Custom(SmallVec<[DashStop; 4]>),
}

impl Dash {
    /// Dash for a canvas line style. `custom` lengths are only read for
    /// [`LineStyle::Custom`].
    pub fn from_style(style: LineStyle, custom: &[i32], line_width: i32) -> Self {
        match style.preset() {
            Some(preset) => Self::Preset(preset),
            None if custom.is_empty() => Self::Preset("solid"),
            None => Self::Custom(normalize_dashes(custom, line_width)),
        }
    }
}

/// Outline of a shape, width still in pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stroke {
    pub width: i32,
    pub color: Color,
    pub dash: Dash,
}

impl Stroke {
    pub fn solid(width: i32, color: Color) -> Self {
        Self {
            width,
            color,
            dash: Dash::Preset("solid"),
        }
    }

    /// Write `<a:ln>` with the width already scaled to EMU.
    pub fn write_xml(&self, xml: &mut String, width_emu: i64) -> Result<()> {
        write!(xml, r#"<a:ln cap="flat" cmpd="sng" w="{}">"#, width_emu)?;
        write_solid_fill(xml, self.color)?;
        match &self.dash {
            Dash::Preset(preset) => write!(xml, r#"<a:prstDash val="{}"/>"#, preset)?,
            Dash::Custom(stops) => {
                xml.push_str("<a:custDash>");
                for stop in stops {
                    write!(
                        xml,
                        r#"<a:ds d="{}" sp="{}"/>"#,
                        stop.dash as i64 * 1000,
                        stop.space as i64 * 1000
                    )?;
                }
                xml.push_str("</a:custDash>");
            },
        }
        xml.push_str("<a:round/>");
        xml.push_str(r#"<a:headEnd len="lg" w="lg" type="none"/><a:tailEnd len="lg" w="lg" type="none"/>"#);
        xml.push_str("</a:ln>");
        Ok(())
    }
}

/// `<a:ln>` of a shape without an outline.
pub(crate) fn write_no_line(xml: &mut String) {
    xml.push_str("<a:ln><a:noFill/></a:ln>");
}
