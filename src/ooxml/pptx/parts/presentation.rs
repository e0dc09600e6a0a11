/// Presentation descriptor and its relationship part.
use crate::ooxml::error::{ExportError, Result};
use crate::ooxml::opc::constants::{namespace, relationship_type as rt};
use crate::ooxml::pptx::writer::relmap::{FIRST_SLIDE_ID, FIRST_SLIDE_REL_ID};
use std::fmt::Write as FmtWrite;

/// Id of the single slide master in `sldMasterIdLst`.
pub const SLIDE_MASTER_ID: u32 = 2_147_483_659;

/// `ppt/presentation.xml` for a fixed number of slides.
///
/// Slide `i` (1-based) is listed as `sldId id=FIRST_SLIDE_ID+i-1` with
/// relationship `rId{FIRST_SLIDE_REL_ID+i-1}`, and the relationship part built
/// by [`PresentationPart::rels_xml`] maps that same id to `slides/slide{i}.xml`.
#[derive(Debug, Clone, Copy)]
pub struct PresentationPart {
    /// Number of slides
    slide_count: u32,
    /// Slide width in EMUs
    slide_width: i64,
    /// Slide height in EMUs
    slide_height: i64,
}

impl PresentationPart {
    pub fn new(slide_count: u32, slide_width: i64, slide_height: i64) -> Self {
        Self {
            slide_count,
            slide_width,
            slide_height,
        }
    }

    /// Relationship id of slide `index` (1-based).
    pub fn slide_rel_id(index: u32) -> String {
        format!("rId{}", FIRST_SLIDE_REL_ID + index - 1)
    }

    /// Generate presentation.xml content.
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(1024 + 48 * self.slide_count as usize);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        write!(
            xml,
            r#"<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1">"#,
            namespace::DML_MAIN,
            namespace::OFC_RELATIONSHIPS,
            namespace::PML_MAIN
        )
        .map_err(|e| ExportError::Xml(e.to_string()))?;

        // Write slide master ID list
        xml.push_str("<p:sldMasterIdLst>");
        write!(xml, r#"<p:sldMasterId id="{}" r:id="rId3"/>"#, SLIDE_MASTER_ID)
            .map_err(|e| ExportError::Xml(e.to_string()))?;
        xml.push_str("</p:sldMasterIdLst>");

        // Write slide ID list
        if self.slide_count > 0 {
            xml.push_str("<p:sldIdLst>");
            for index in 1..=self.slide_count {
                write!(
                    xml,
                    r#"<p:sldId id="{}" r:id="{}"/>"#,
                    FIRST_SLIDE_ID + index - 1,
                    Self::slide_rel_id(index)
                )
                .map_err(|e| ExportError::Xml(e.to_string()))?;
            }
            xml.push_str("</p:sldIdLst>");
        }

        write!(
            xml,
            r#"<p:sldSz cx="{}" cy="{}"/>"#,
            self.slide_width, self.slide_height
        )
        .map_err(|e| ExportError::Xml(e.to_string()))?;

        // Notes pages are portrait, so the slide size is swapped.
        write!(
            xml,
            r#"<p:notesSz cx="{}" cy="{}"/>"#,
            self.slide_height, self.slide_width
        )
        .map_err(|e| ExportError::Xml(e.to_string()))?;
        xml.push_str("</p:presentation>");

        Ok(xml)
    }

    /// Generate `ppt/_rels/presentation.xml.rels`: theme, presentation
    /// properties and master on `rId1..rId3`, then one entry per slide.
    pub fn rels_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(512 + 160 * self.slide_count as usize);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        write!(xml, r#"<Relationships xmlns="{}">"#, namespace::OPC_RELATIONSHIPS)?;
        write!(
            xml,
            r#"<Relationship Id="rId1" Type="{}" Target="theme/theme1.xml"/>"#,
            rt::THEME
        )?;
        write!(
            xml,
            r#"<Relationship Id="rId2" Type="{}" Target="presProps.xml"/>"#,
            rt::PRES_PROPS
        )?;
        write!(
            xml,
            r#"<Relationship Id="rId3" Type="{}" Target="slideMasters/slideMaster1.xml"/>"#,
            rt::SLIDE_MASTER
        )?;
        for index in 1..=self.slide_count {
            write!(
                xml,
                r#"<Relationship Id="{}" Type="{}" Target="slides/slide{}.xml"/>"#,
                Self::slide_rel_id(index),
                rt::SLIDE,
                index
            )?;
        }
        xml.push_str("</Relationships>");

        Ok(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slide_ids_and_rels_agree() {
        let part = PresentationPart::new(2, 9_720_000, 7_020_000);
        let xml = part.to_xml().unwrap();
        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId4"/>"#));
        assert!(xml.contains(r#"<p:sldId id="257" r:id="rId5"/>"#));
        assert!(xml.contains(r#"<p:sldSz cx="9720000" cy="7020000"/>"#));
        assert!(xml.contains(r#"<p:notesSz cx="7020000" cy="9720000"/>"#));

        let rels = part.rels_xml().unwrap();
        assert!(rels.contains(r#"Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml""#));
        assert!(rels.contains(r#"Target="slides/slide2.xml""#));
        assert!(rels.contains(r#"Id="rId3""#));
    }

    #[test]
    fn test_no_slides() {
        let xml = PresentationPart::new(0, 100, 100).to_xml().unwrap();
        assert!(!xml.contains("sldIdLst"));
    }
}
