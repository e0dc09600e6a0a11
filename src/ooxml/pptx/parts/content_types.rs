//! `[Content_Types].xml` builder.

use crate::common::xml::escape_xml;
use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::{content_type as ct, namespace};
use crate::ooxml::pptx::format::ImageFormat;
use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite;

/// Default and Override content type entries.
///
/// Both maps are ordered, so the generated part is stable for a given
/// slide count.
#[derive(Debug, Clone)]
pub struct ContentTypes {
    /// Default content types by extension
    defaults: BTreeMap<String, String>,
    /// Override content types by part name
    overrides: BTreeMap<String, String>,
}

impl ContentTypes {
    /// Content types of a presentation with `slide_count` slides.
    pub fn for_presentation(slide_count: u32) -> Self {
        let mut cti = Self::new();

        cti.add_default(ImageFormat::Png.extension(), ImageFormat::Png.mime_type());
        cti.add_default(ImageFormat::Jpeg.extension(), ImageFormat::Jpeg.mime_type());

        cti.add_override(super::PRESENTATION, ct::PML_PRESENTATION_MAIN);
        cti.add_override(super::PRES_PROPS, ct::PML_PRES_PROPS);
        cti.add_override(super::SLIDE_LAYOUT, ct::PML_SLIDE_LAYOUT);
        cti.add_override(super::SLIDE_MASTER, ct::PML_SLIDE_MASTER);
        cti.add_override(super::THEME, ct::OFC_THEME);
        for index in 1..=slide_count {
            cti.add_override(&super::slide(index), ct::PML_SLIDE);
        }

        cti
    }

    fn new() -> Self {
        let mut defaults = BTreeMap::new();

        // Add standard defaults
        defaults.insert("rels".to_string(), ct::OPC_RELATIONSHIPS.to_string());
        defaults.insert("xml".to_string(), ct::XML.to_string());

        Self {
            defaults,
            overrides: BTreeMap::new(),
        }
    }

    pub fn add_default(&mut self, ext: &str, content_type: &str) {
        self.defaults
            .insert(ext.to_string(), content_type.to_string());
    }

    /// Add an override for `part` (a staging-relative path).
    pub fn add_override(&mut self, part: &str, content_type: &str) {
        self.overrides
            .insert(format!("/{}", part), content_type.to_string());
    }

    /// Number of override entries with the given content type.
    pub fn count_overrides(&self, content_type: &str) -> usize {
        self.overrides
            .values()
            .filter(|ct| ct.as_str() == content_type)
            .count()
    }

    /// Generate the XML for `[Content_Types].xml`.
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(2048);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        write!(xml, r#"<Types xmlns="{}">"#, namespace::OPC_CONTENT_TYPES)?;
        xml.push('\n');

        for (ext, content_type) in &self.defaults {
            write!(
                xml,
                r#"  <Default Extension="{}" ContentType="{}"/>"#,
                escape_xml(ext),
                escape_xml(content_type)
            )?;
            xml.push('\n');
        }

        for (part_name, content_type) in &self.overrides {
            write!(
                xml,
                r#"  <Override PartName="{}" ContentType="{}"/>"#,
                escape_xml(part_name),
                escape_xml(content_type)
            )?;
            xml.push('\n');
        }

        xml.push_str("</Types>");

        Ok(xml)
    }
}
