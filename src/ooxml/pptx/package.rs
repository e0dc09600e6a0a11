//! Archiving of a finalized staging tree.
//!
//! The set of files in the package is known from the document counters
//! alone, so nothing here lists directories. [`Manifest`] names every part,
//! an [`Archiver`] packs them, and [`cleanup`] removes the staging tree
//! afterwards whether or not archiving succeeded.

use crate::ooxml::error::{ExportError, Result};
use crate::ooxml::pptx::format::ImageFormat;
use crate::ooxml::pptx::parts;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{debug, warn};
use zip::write::{SimpleFileOptions, ZipWriter};

/// Parts that are present in every package.
pub const FIXED_PART_COUNT: usize = 10;

/// Ordered list of the parts of a staged package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<String>,
}

impl Manifest {
    /// Build the manifest of a package with `media_count` media parts and
    /// `slide_count` slides.
    ///
    /// The result has `media_count + 2 * slide_count + 10` entries.
    pub fn from_counts(media_count: u32, slide_count: u32, media_format: ImageFormat) -> Self {
        let mut entries =
            Vec::with_capacity(media_count as usize + 2 * slide_count as usize + FIXED_PART_COUNT);

        entries.push(parts::CONTENT_TYPES.to_string());
        entries.push(parts::PRESENTATION.to_string());
        entries.push(parts::PRES_PROPS.to_string());
        entries.extend((0..media_count).map(|i| parts::media(i, media_format)));
        entries.push(parts::SLIDE_LAYOUT.to_string());
        entries.push(parts::SLIDE_LAYOUT_RELS.to_string());
        entries.push(parts::SLIDE_MASTER.to_string());
        entries.push(parts::SLIDE_MASTER_RELS.to_string());
        for index in 1..=slide_count {
            entries.push(parts::slide(index));
            entries.push(parts::slide_rels(index));
        }
        entries.push(parts::THEME.to_string());
        entries.push(parts::PRESENTATION_RELS.to_string());
        entries.push(parts::PACKAGE_RELS.to_string());

        Self { entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Packs the files of a staging tree into one archive.
pub trait Archiver {
    /// Write every manifest entry under `root` to `target`, each stored under
    /// its relative name.
    fn archive(&self, root: &Path, manifest: &Manifest, target: &Path) -> Result<()>;
}

/// Deflate-compressed zip archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiver;

impl Archiver for ZipArchiver {
    fn archive(&self, root: &Path, manifest: &Manifest, target: &Path) -> Result<()> {
        let file = File::create(target)?;
        let mut zip = ZipWriter::new(BufWriter::new(file));
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for entry in manifest.entries() {
            let mut source = File::open(root.join(entry))
                .map_err(|e| ExportError::Archive(format!("cannot read staged part {}: {}", entry, e)))?;
            zip.start_file(entry.as_str(), options)?;
            io::copy(&mut source, &mut zip)?;
        }

        let mut out = zip.finish()?;
        out.flush()?;
        debug!(path = %target.display(), entries = manifest.len(), "wrote zip archive");
        Ok(())
    }
}

/// Remove a staging tree: manifest files, then the fixed directories
/// children first, then the root.
///
/// Problems are logged and never returned; a file that is already gone is not
/// a problem.
pub fn cleanup(root: &Path, manifest: &Manifest) {
    for entry in manifest.entries() {
        let path = root.join(entry);
        if let Err(e) = fs::remove_file(&path)
            && e.kind() != io::ErrorKind::NotFound
        {
            warn!(path = %path.display(), error = %e, "failed to remove staged file");
        }
    }

    for dir in parts::STAGING_DIRS.iter().rev() {
        let path = root.join(dir);
        if let Err(e) = fs::remove_dir(&path)
            && e.kind() != io::ErrorKind::NotFound
        {
            warn!(path = %path.display(), error = %e, "failed to remove staging directory");
        }
    }

    if let Err(e) = fs::remove_dir(root)
        && e.kind() != io::ErrorKind::NotFound
    {
        warn!(path = %root.display(), error = %e, "failed to remove staging root");
    }
}
