/// Presentation document being exported.
use crate::common::unit::{ScaleFactors, mm_to_emu};
use crate::config::ExportOptions;
use crate::ooxml::error::{ExportError, Result};
use crate::ooxml::pptx::package::{Archiver, Manifest, cleanup};
use crate::ooxml::pptx::parts::{self, ContentTypes, PresentationPart};
use crate::ooxml::pptx::template;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

use super::media::{PngEncoder, RasterEncoder};
use super::relmap::IdAllocator;
use super::shape::ShapeWriter;
use super::slide::SlideStream;

/// Prefix of staging directory names.
pub const STAGING_PREFIX: &str = "canvas-pptx-";

/// Lifecycle of a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    /// A slide accepts shapes
    SlideOpen,
    /// Between `close_slide` and the next `open_slide`
    SlideClosed,
    /// Global descriptors written; only `package` remains
    Finalized,
    /// Archive written and staging tree removed
    Packaged,
    /// Staging tree removed without producing an archive
    Aborted,
}

/// A presentation staged on disk, one slide at a time.
///
/// Shapes go to the open slide through [`Document::shape_writer`]. Closing a
/// slide makes its index final; [`Document::finalize`] writes the descriptors
/// that list every closed slide and [`Document::package`] turns the staging
/// tree into a single archive.
///
/// Dropping a document that was never packaged removes its staging tree.
pub struct Document {
    /// Open slide; declared first so its files close before the tree goes
    slide: Option<SlideStream>,
    /// Owner of the staging tree until packaging takes it over
    staging: Option<TempDir>,
    root: PathBuf,
    width_mm: f64,
    height_mm: f64,
    width_px: u32,
    height_px: u32,
    slide_width: i64,
    slide_height: i64,
    scale: ScaleFactors,
    ids: IdAllocator,
    state: DocumentState,
    encoder: Box<dyn RasterEncoder + Send>,
    options: ExportOptions,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("root", &self.root)
            .field("state", &self.state)
            .field("scale", &self.scale)
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}

impl Document {
    /// Create the staging tree and open slide 1.
    ///
    /// # Arguments
    /// * `width_mm`, `height_mm` - Physical slide size in millimetres
    /// * `width_px`, `height_px` - Pixel extent drawn onto the slide
    /// * `options` - Export options
    ///
    /// On failure nothing is left on disk.
    pub fn create(width_mm: f64, height_mm: f64, width_px: u32, height_px: u32, options: &ExportOptions) -> Result<Self> {
        Self::create_with_encoder(width_mm, height_mm, width_px, height_px, options, Box::new(PngEncoder))
    }

    /// [`Document::create`] with a custom media encoder.
    pub fn create_with_encoder(
        width_mm: f64,
        height_mm: f64,
        width_px: u32,
        height_px: u32,
        options: &ExportOptions,
        encoder: Box<dyn RasterEncoder + Send>,
    ) -> Result<Self> {
        options.validate()?;
        if !(width_mm > 0.0 && height_mm > 0.0) {
            return Err(ExportError::InvalidGeometry(format!(
                "slide size must be positive, got {}x{} mm",
                width_mm, height_mm
            )));
        }

        let slide_width = mm_to_emu(width_mm);
        let slide_height = mm_to_emu(height_mm);
        let scale = ScaleFactors::from_extent(slide_width, slide_height, width_px, height_px)?;

        let mut builder = tempfile::Builder::new();
        builder.prefix(STAGING_PREFIX);
        let staging = match &options.staging_parent {
            Some(parent) => builder.tempdir_in(parent)?,
            None => builder.tempdir()?,
        };
        let root = staging.path().to_path_buf();

        for dir in parts::STAGING_DIRS {
            fs::create_dir(root.join(dir))?;
        }
        for (part, content) in [
            (parts::PRES_PROPS, template::pres_props_xml()),
            (parts::PACKAGE_RELS, template::package_rels_xml()),
            (parts::SLIDE_LAYOUT, template::slide_layout_xml()),
            (parts::SLIDE_LAYOUT_RELS, template::slide_layout_rels_xml()),
            (parts::SLIDE_MASTER, template::slide_master_xml()),
            (parts::SLIDE_MASTER_RELS, template::slide_master_rels_xml()),
            (parts::THEME, template::theme_xml()),
        ] {
            fs::write(root.join(part), content)?;
        }

        let mut doc = Self {
            slide: None,
            staging: Some(staging),
            root,
            width_mm,
            height_mm,
            width_px,
            height_px,
            slide_width,
            slide_height,
            scale,
            ids: IdAllocator::new(),
            state: DocumentState::SlideClosed,
            encoder,
            options: options.clone(),
        };
        debug!(
            root = %doc.root.display(),
            slide_width,
            slide_height,
            scale_x = scale.x(),
            scale_y = scale.y(),
            "created document"
        );

        doc.open_slide()?;
        Ok(doc)
    }

    /// Open the next slide.
    ///
    /// The slide's group shape takes one shape id.
    pub fn open_slide(&mut self) -> Result<()> {
        self.expect_state(DocumentState::SlideClosed, "open a slide")?;

        let group_id = self.ids.next_shape_id();
        let slide = SlideStream::open(&self.root, self.ids.slide_index(), group_id)?;
        self.ids.commit_shape();
        self.slide = Some(slide);
        self.state = DocumentState::SlideOpen;
        Ok(())
    }

    /// Close the open slide.
    ///
    /// The slide index advances even when flushing fails, since the slide's
    /// files already exist.
    pub fn close_slide(&mut self) -> Result<()> {
        self.expect_state(DocumentState::SlideOpen, "close a slide")?;
        let slide = self
            .slide
            .take()
            .ok_or_else(|| ExportError::InvalidState("no slide is open".to_string()))?;

        let result = slide.close();
        self.ids.advance_slide();
        self.state = DocumentState::SlideClosed;
        result
    }

    /// Writer for shapes on the open slide.
    pub fn shape_writer(&mut self) -> Result<ShapeWriter<'_>> {
        let slide = self
            .slide
            .as_mut()
            .ok_or_else(|| ExportError::InvalidState("no slide is open".to_string()))?;
        Ok(ShapeWriter {
            root: &self.root,
            slide,
            ids: &mut self.ids,
            scale: self.scale,
            encoder: &*self.encoder,
            policy: self.options.stroke_alpha,
        })
    }

    /// Write the presentation descriptor, content types and presentation
    /// relationships. An open slide is closed first.
    pub fn finalize(&mut self) -> Result<()> {
        match self.state {
            DocumentState::SlideOpen => self.close_slide()?,
            DocumentState::SlideClosed => {},
            _ => return self.expect_state(DocumentState::SlideClosed, "finalize"),
        }

        let slide_count = self.ids.slides_closed();
        let presentation = PresentationPart::new(slide_count, self.slide_width, self.slide_height);
        fs::write(self.root.join(parts::PRESENTATION), presentation.to_xml()?)?;
        fs::write(
            self.root.join(parts::CONTENT_TYPES),
            ContentTypes::for_presentation(slide_count).to_xml()?,
        )?;
        fs::write(self.root.join(parts::PRESENTATION_RELS), presentation.rels_xml()?)?;

        self.state = DocumentState::Finalized;
        debug!(slides = slide_count, media = self.ids.media_count(), "finalized document");
        Ok(())
    }

    /// Archive the staging tree into `target` and remove the tree.
    ///
    /// The tree is removed even when archiving fails; the archiver's error is
    /// returned.
    pub fn package(&mut self, target: &Path, archiver: &dyn Archiver) -> Result<()> {
        self.expect_state(DocumentState::Finalized, "package")?;
        let staging = self
            .staging
            .take()
            .ok_or_else(|| ExportError::InvalidState("staging tree is gone".to_string()))?;
        let root = staging.keep();

        let manifest = Manifest::from_counts(self.ids.media_count(), self.ids.slides_closed(), self.encoder.format());
        let result = archiver.archive(&root, &manifest, target);
        cleanup(&root, &manifest);
        self.state = DocumentState::Packaged;

        if result.is_ok() {
            info!(
                path = %target.display(),
                slides = self.ids.slides_closed(),
                media = self.ids.media_count(),
                "packaged presentation"
            );
        }
        result
    }

    /// Remove the staging tree without packaging. Calling it again, or after
    /// packaging, does nothing.
    pub fn abort(&mut self) {
        drop(self.slide.take());
        if let Some(staging) = self.staging.take()
            && let Err(e) = staging.close()
        {
            warn!(root = %self.root.display(), error = %e, "failed to remove staging tree");
        }
        if self.state != DocumentState::Packaged {
            self.state = DocumentState::Aborted;
        }
    }

    pub fn state(&self) -> DocumentState {
        self.state
    }

    /// Staging root; gone once the document is packaged or aborted.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn scale(&self) -> ScaleFactors {
        self.scale
    }

    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Slide size in EMUs.
    pub fn slide_size(&self) -> (i64, i64) {
        (self.slide_width, self.slide_height)
    }

    /// Slide size in millimetres.
    pub fn size_mm(&self) -> (f64, f64) {
        (self.width_mm, self.height_mm)
    }

    /// Pixel extent of a slide.
    pub fn size_px(&self) -> (u32, u32) {
        (self.width_px, self.height_px)
    }

    fn expect_state(&self, expected: DocumentState, action: &str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ExportError::InvalidState(format!(
                "cannot {} while the document is {:?}",
                action, self.state
            )))
        }
    }
}

impl Drop for Document {
    fn drop(&mut self) {
        if self.staging.is_some() {
            debug!(root = %self.root.display(), state = ?self.state, "dropping unpackaged document");
            self.abort();
        }
    }
}
