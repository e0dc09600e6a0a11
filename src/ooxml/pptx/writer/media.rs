/// Raster media parts: pixel buffers, encoding and atomic storage.
use crate::common::Color;
use crate::ooxml::error::{ExportError, Result};
use crate::ooxml::pptx::format::ImageFormat;
use crate::ooxml::pptx::parts;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, warn};

use super::relmap::{IdAllocator, MediaSlot};
use super::slide::SlideStream;

/// Channel layout of a [`Raster`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    Rgb,
    Rgba,
}

impl PixelLayout {
    pub fn channels(&self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }
}

/// Interleaved 8-bit pixel buffer, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    layout: PixelLayout,
    data: Vec<u8>,
}

impl Raster {
    /// Wrap an interleaved buffer, checking its length.
    pub fn new(width: u32, height: u32, layout: PixelLayout, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * layout.channels();
        if width == 0 || height == 0 || data.len() != expected {
            return Err(ExportError::InvalidGeometry(format!(
                "{}x{} {:?} raster needs {} bytes, got {}",
                width,
                height,
                layout,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    /// Build a raster by asking `pixel(col, row)` for every pixel.
    pub fn from_fn<F>(width: u32, height: u32, layout: PixelLayout, mut pixel: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> Color,
    {
        let mut data = Vec::with_capacity(width as usize * height as usize * layout.channels());
        for row in 0..height {
            for col in 0..width {
                let c = pixel(col, row);
                data.extend_from_slice(&[c.r, c.g, c.b]);
                if layout == PixelLayout::Rgba {
                    data.push(c.a);
                }
            }
        }
        Self::new(width, height, layout, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at `(col, row)`; opaque for RGB rasters.
    pub fn pixel(&self, col: u32, row: u32) -> Option<Color> {
        if col >= self.width || row >= self.height {
            return None;
        }
        let n = self.layout.channels();
        let at = (row as usize * self.width as usize + col as usize) * n;
        let px = &self.data[at..at + n];
        Some(match self.layout {
            PixelLayout::Rgb => Color::rgb(px[0], px[1], px[2]),
            PixelLayout::Rgba => Color::rgba(px[0], px[1], px[2], px[3]),
        })
    }
}

/// Encodes rasters into media part bytes.
pub trait RasterEncoder {
    /// Format of the produced bytes.
    fn format(&self) -> ImageFormat;

    fn encode(&self, raster: &Raster) -> Result<Vec<u8>>;
}

/// PNG encoder backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngEncoder;

impl RasterEncoder for PngEncoder {
    fn format(&self) -> ImageFormat {
        ImageFormat::Png
    }

    fn encode(&self, raster: &Raster) -> Result<Vec<u8>> {
        let (w, h, data) = (raster.width(), raster.height(), raster.data().to_vec());
        let img = match raster.layout() {
            PixelLayout::Rgb => image::RgbImage::from_raw(w, h, data).map(image::DynamicImage::ImageRgb8),
            PixelLayout::Rgba => image::RgbaImage::from_raw(w, h, data).map(image::DynamicImage::ImageRgba8),
        }
        .ok_or_else(|| ExportError::Encode(format!("{}x{} buffer does not fit its size", w, h)))?;

        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, image::ImageFormat::Png)?;
        Ok(buffer.into_inner())
    }
}

/// Where fill resolution and picture emission put their rasters.
pub trait MediaSink {
    /// Store `raster` as a new media part and return its slot.
    ///
    /// Implementations must not consume a slot when they fail.
    fn store(&mut self, raster: &Raster) -> Result<MediaSlot>;
}

/// [`MediaSink`] writing into the staging tree of a document.
pub(crate) struct MediaStore<'a> {
    pub(crate) root: &'a Path,
    pub(crate) ids: &'a mut IdAllocator,
    pub(crate) slide: &'a mut SlideStream,
    pub(crate) encoder: &'a dyn RasterEncoder,
}

impl MediaSink for MediaStore<'_> {
    fn store(&mut self, raster: &Raster) -> Result<MediaSlot> {
        let slot = self.ids.next_media();
        let format = self.encoder.format();
        let bytes = self.encoder.encode(raster)?;
        if ImageFormat::detect_from_bytes(&bytes) != Some(format) {
            return Err(ExportError::Encode(format!(
                "encoder output is not {}",
                format.mime_type()
            )));
        }

        let path = self.root.join(parts::media(slot.index, format));
        let written = fs::write(&path, &bytes)
            .map_err(ExportError::from)
            .and_then(|_| self.slide.add_image_rel(slot, format));
        if let Err(e) = written {
            if path.exists()
                && let Err(rm) = fs::remove_file(&path)
            {
                warn!(path = %path.display(), error = %rm, "could not remove partial media file");
            }
            return Err(e);
        }

        self.ids.commit_media(slot);
        debug!(
            media = slot.index,
            rel_id = slot.rel_id,
            width = raster.width(),
            height = raster.height(),
            "stored media part"
        );
        Ok(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_length_checked() {
        assert!(Raster::new(2, 2, PixelLayout::Rgb, vec![0; 12]).is_ok());
        assert!(Raster::new(2, 2, PixelLayout::Rgba, vec![0; 12]).is_err());
        assert!(Raster::new(0, 2, PixelLayout::Rgb, vec![]).is_err());
    }

    #[test]
    fn test_from_fn_row_major() {
        let r = Raster::from_fn(3, 2, PixelLayout::Rgba, |c, r| {
            Color::rgba(c as u8, r as u8, 0, 9)
        })
        .unwrap();
        assert_eq!(r.pixel(2, 1), Some(Color::rgba(2, 1, 0, 9)));
        assert_eq!(r.pixel(3, 0), None);
        assert_eq!(r.data().len(), 24);
    }

    #[test]
    fn test_png_encoder() {
        let r = Raster::from_fn(4, 4, PixelLayout::Rgb, |_, _| Color::rgb(255, 0, 0)).unwrap();
        let bytes = PngEncoder.encode(&r).unwrap();
        assert_eq!(ImageFormat::detect_from_bytes(&bytes), Some(ImageFormat::Png));

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (4, 4));
        assert_eq!(decoded.get_pixel(3, 3).0, [255, 0, 0]);
    }
}
