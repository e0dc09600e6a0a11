//! Unit conversion utilities.
//!
//! DrawingML expresses every length in EMU (English Metric Units) and every
//! angle in 1/60000 of a degree. Canvas drivers work in device pixels, so the
//! conversion from pixels happens through a per-axis [`ScaleFactors`] value
//! that is computed once per document.

use crate::ooxml::error::{ExportError, Result};

pub const EMUS_PER_INCH: i64 = 914_400;
pub const EMUS_PER_CM: i64 = 360_000;
pub const EMUS_PER_MM: i64 = 36_000;
pub const EMUS_PER_PT: i64 = 12_700;

/// DrawingML angle units per degree.
pub const ANGLE_UNITS_PER_DEGREE: f64 = 60_000.0;

/// Percentage units used by `a:alpha` and friends (100% == 100000).
pub const PERCENT_UNITS: f64 = 100_000.0;

#[inline]
pub fn mm_to_emu(mm: f64) -> i64 {
    (mm * EMUS_PER_MM as f64) as i64
}

#[inline]
pub fn emu_to_mm(emu: i64) -> f64 {
    emu as f64 / EMUS_PER_MM as f64
}

#[inline]
pub fn pt_to_emu(pt: f64) -> i64 {
    (pt * EMUS_PER_PT as f64) as i64
}

/// Convert degrees to DrawingML angle units, truncating toward zero.
#[inline]
pub fn to_angle(degrees: f64) -> i64 {
    (degrees * ANGLE_UNITS_PER_DEGREE) as i64
}

/// Convert an 8-bit alpha value to DrawingML percentage units.
#[inline]
pub fn alpha_to_pct(alpha: u8) -> i64 {
    ((alpha as f64 / 255.0) * PERCENT_UNITS) as i64
}

/// Per-axis pixel to EMU multipliers.
///
/// Factors are integral, like the slide size they derive from, so a pixel
/// coordinate always maps to a whole number of EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleFactors {
    x: i64,
    y: i64,
}

impl ScaleFactors {
    /// Derive the factors from a physical slide size (EMU) and the pixel
    /// extent that should cover it.
    pub fn from_extent(width_emu: i64, height_emu: i64, width_px: u32, height_px: u32) -> Result<Self> {
        if width_px == 0 || height_px == 0 {
            return Err(ExportError::InvalidGeometry(format!(
                "pixel extent must be non-zero, got {}x{}",
                width_px, height_px
            )));
        }

        let x = width_emu / width_px as i64;
        let y = height_emu / height_px as i64;
        if x <= 0 || y <= 0 {
            return Err(ExportError::InvalidGeometry(format!(
                "slide of {}x{} EMU is smaller than {}x{} pixels",
                width_emu, height_emu, width_px, height_px
            )));
        }

        Ok(Self { x, y })
    }

    #[inline]
    pub fn x(&self) -> i64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> i64 {
        self.y
    }

    #[inline]
    pub fn sx(&self, px: i32) -> i64 {
        px as i64 * self.x
    }

    #[inline]
    pub fn sy(&self, px: i32) -> i64 {
        px as i64 * self.y
    }
}
