/// Streaming writer for one open slide.
use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::relationship_type as rt;
use crate::ooxml::pptx::format::ImageFormat;
use crate::ooxml::pptx::{parts, template};
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

use super::relmap::MediaSlot;

/// The markup and relationship streams of the slide being drawn.
///
/// Shapes are appended as they are emitted; nothing is kept in memory after
/// a write. Both files are flushed and closed by [`SlideStream::close`], and
/// dropping the value closes them too.
#[derive(Debug)]
pub struct SlideStream {
    /// Slide index (1-based)
    index: u32,
    /// `ppt/slides/slide{index}.xml`
    markup: BufWriter<File>,
    /// `ppt/slides/_rels/slide{index}.xml.rels`
    rels: BufWriter<File>,
    /// Shapes written to this slide, the group shape excluded
    shape_count: usize,
}

impl SlideStream {
    /// Create both slide files under `root` and write their prefixes.
    ///
    /// # Arguments
    /// * `root` - Staging root
    /// * `index` - Slide index (1-based)
    /// * `group_id` - Shape id of the slide's shape tree group
    pub fn open(root: &Path, index: u32, group_id: u32) -> Result<Self> {
        let markup = BufWriter::new(File::create(root.join(parts::slide(index)))?);
        let rels = BufWriter::new(File::create(root.join(parts::slide_rels(index)))?);

        let mut stream = Self {
            index,
            markup,
            rels,
            shape_count: 0,
        };

        let mut prefix = String::with_capacity(512);
        template::write_slide_prefix(&mut prefix, group_id)?;
        stream.markup.write_all(prefix.as_bytes())?;

        prefix.clear();
        template::write_slide_rels_prefix(&mut prefix)?;
        stream.rels.write_all(prefix.as_bytes())?;

        debug!(slide = index, group_id, "opened slide");
        Ok(stream)
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn shape_count(&self) -> usize {
        self.shape_count
    }

    /// Append one complete shape element.
    pub fn write_shape(&mut self, xml: &str) -> Result<()> {
        self.markup.write_all(xml.as_bytes())?;
        self.shape_count += 1;
        Ok(())
    }

    /// Register the image relationship of a media slot.
    pub fn add_image_rel(&mut self, slot: MediaSlot, format: ImageFormat) -> Result<()> {
        let mut xml = String::with_capacity(192);
        write!(
            xml,
            r#"<Relationship Id="{}" Type="{}" Target="../media/image{}.{}"/>"#,
            slot.rel_id_string(),
            rt::IMAGE,
            slot.index,
            format.extension()
        )?;
        xml.push('\n');
        self.rels.write_all(xml.as_bytes())?;
        Ok(())
    }

    /// Write both suffixes and close the files.
    ///
    /// The streams are consumed, so they are closed whether or not a write
    /// fails.
    pub fn close(mut self) -> Result<()> {
        let markup = self
            .markup
            .write_all(template::slide_suffix().as_bytes())
            .and_then(|_| self.markup.flush());
        let rels = self
            .rels
            .write_all(template::slide_rels_suffix().as_bytes())
            .and_then(|_| self.rels.flush());

        debug!(slide = self.index, shapes = self.shape_count, "closed slide");
        markup?;
        rels?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn staging() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("ppt/slides/_rels")).unwrap();
        dir
    }

    #[test]
    fn test_open_write_close() {
        let dir = staging();
        let mut slide = SlideStream::open(dir.path(), 2, 60).unwrap();
        slide.write_shape("<p:sp/>").unwrap();
        slide
            .add_image_rel(MediaSlot { index: 0, rel_id: 4 }, ImageFormat::Png)
            .unwrap();
        assert_eq!(slide.shape_count(), 1);
        slide.close().unwrap();

        let markup = fs::read_to_string(dir.path().join("ppt/slides/slide2.xml")).unwrap();
        assert!(markup.contains(r#"<p:cNvPr id="60" name="Shape 60"/>"#));
        assert!(markup.contains("<p:sp/>"));
        assert!(markup.ends_with("</p:sld>"));

        let rels = fs::read_to_string(dir.path().join("ppt/slides/_rels/slide2.xml.rels")).unwrap();
        assert!(rels.contains(r#"Id="rId1""#));
        assert!(rels.contains(r#"Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image0.png""#));
        assert!(rels.ends_with("</Relationships>"));
    }

    #[test]
    fn test_open_fails_without_directories() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SlideStream::open(dir.path(), 1, 51).is_err());
    }
}
