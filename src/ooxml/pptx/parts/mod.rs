//! Part names of the staged package and the generated descriptor parts.
//!
//! Every path here is relative to the staging root and uses `/` separators,
//! which is also how entries are named inside the final archive.

pub mod content_types;
pub mod presentation;

pub use content_types::ContentTypes;
pub use presentation::PresentationPart;

use super::format::ImageFormat;

pub const CONTENT_TYPES: &str = "[Content_Types].xml";
pub const PRESENTATION: &str = "ppt/presentation.xml";
pub const PRES_PROPS: &str = "ppt/presProps.xml";
pub const SLIDE_LAYOUT: &str = "ppt/slideLayouts/slideLayout1.xml";
pub const SLIDE_LAYOUT_RELS: &str = "ppt/slideLayouts/_rels/slideLayout1.xml.rels";
pub const SLIDE_MASTER: &str = "ppt/slideMasters/slideMaster1.xml";
pub const SLIDE_MASTER_RELS: &str = "ppt/slideMasters/_rels/slideMaster1.xml.rels";
pub const THEME: &str = "ppt/theme/theme1.xml";
pub const PRESENTATION_RELS: &str = "ppt/_rels/presentation.xml.rels";
pub const PACKAGE_RELS: &str = "_rels/.rels";

/// Staging directories, parents before children.
///
/// Cleanup walks this list backwards so every directory is empty by the time
/// it is removed.
pub const STAGING_DIRS: [&str; 11] = [
    "ppt",
    "ppt/_rels",
    "ppt/slideLayouts",
    "ppt/slideLayouts/_rels",
    "ppt/slideMasters",
    "ppt/slideMasters/_rels",
    "ppt/slides",
    "ppt/slides/_rels",
    "ppt/theme",
    "ppt/media",
    "_rels",
];

/// Markup part of slide `index` (1-based).
pub fn slide(index: u32) -> String {
    format!("ppt/slides/slide{}.xml", index)
}

/// Relationship part of slide `index` (1-based).
pub fn slide_rels(index: u32) -> String {
    format!("ppt/slides/_rels/slide{}.xml.rels", index)
}

/// Media part number `index` (0-based).
pub fn media(index: u32, format: ImageFormat) -> String {
    format!("ppt/media/image{}.{}", index, format.extension())
}
