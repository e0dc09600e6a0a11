//! Presentation template module.
//!
//! Provides the static parts every exported package shares (theme, master,
//! layout and their relationships) plus the fixed prefix and suffix of the
//! per-slide parts.

use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::{namespace, relationship_type as rt};
use std::fmt::Write as FmtWrite;

/// Relationship id of the slide layout inside every slide's relationships.
pub const SLIDE_LAYOUT_REL_ID: &str = "rId1";

/// Blank slide layout.
pub fn slide_layout_xml() -> &'static str {
    include_str!("resources/slideLayouts/slideLayout1.xml")
}

/// Relationships of the slide layout (its master).
pub fn slide_layout_rels_xml() -> &'static str {
    include_str!("resources/rels/slideLayout1.xml.rels")
}

/// Slide master with a white background and a single layout.
pub fn slide_master_xml() -> &'static str {
    include_str!("resources/slideMasters/slideMaster1.xml")
}

/// Relationships of the slide master (layout and theme).
pub fn slide_master_rels_xml() -> &'static str {
    include_str!("resources/rels/slideMaster1.xml.rels")
}

/// Generate a minimal valid theme.xml content.
pub fn theme_xml() -> &'static str {
    include_str!("resources/theme/theme1.xml")
}

/// Generate a minimal valid presProps.xml content.
pub fn pres_props_xml() -> &'static str {
    include_str!("resources/presProps.xml")
}

/// Package relationships (`_rels/.rels`).
pub fn package_rels_xml() -> &'static str {
    include_str!("resources/rels/root.rels")
}

/// Slide prefix up to the open shape tree. The tree's group shape takes
/// `group_id`.
pub fn write_slide_prefix(xml: &mut String, group_id: u32) -> Result<()> {
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    write!(
        xml,
        r#"<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
        namespace::DML_MAIN,
        namespace::OFC_RELATIONSHIPS,
        namespace::PML_MAIN
    )?;
    xml.push_str("<p:cSld><p:spTree>");
    write!(
        xml,
        r#"<p:nvGrpSpPr><p:cNvPr id="{}" name="Shape {}"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
        group_id, group_id
    )?;
    xml.push_str(r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#);
    xml.push_str(r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#);
    xml.push('\n');
    Ok(())
}

/// Closes what [`write_slide_prefix`] opened.
pub fn slide_suffix() -> &'static str {
    "</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"
}

/// Slide relationship prefix, including the layout relationship.
pub fn write_slide_rels_prefix(xml: &mut String) -> Result<()> {
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    write!(xml, r#"<Relationships xmlns="{}">"#, namespace::OPC_RELATIONSHIPS)?;
    write!(
        xml,
        r#"<Relationship Id="{}" Type="{}" Target="../slideLayouts/slideLayout1.xml"/>"#,
        SLIDE_LAYOUT_REL_ID,
        rt::SLIDE_LAYOUT
    )?;
    xml.push('\n');
    Ok(())
}

/// Closes what [`write_slide_rels_prefix`] opened.
pub fn slide_rels_suffix() -> &'static str {
    "</Relationships>"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_parts_are_xml() {
        for part in [
            slide_layout_xml(),
            slide_layout_rels_xml(),
            slide_master_xml(),
            slide_master_rels_xml(),
            theme_xml(),
            pres_props_xml(),
            package_rels_xml(),
        ] {
            assert!(part.starts_with("<?xml"));
        }
        assert!(slide_master_rels_xml().contains(r#"Id="rId11""#));
        assert!(slide_master_xml().contains(r#"r:id="rId11""#));
    }

    #[test]
    fn test_slide_prefix_group_id() {
        let mut xml = String::new();
        write_slide_prefix(&mut xml, 51).unwrap();
        assert!(xml.contains(r#"<p:cNvPr id="51" name="Shape 51"/>"#));
        xml.push_str(slide_suffix());
        assert!(xml.ends_with("</p:sld>"));
    }
}
