//! PowerPoint (.pptx) package export.
//!
//! Drawing output is staged as a directory tree of OOXML parts and archived
//! once the last slide is closed:
//!
//! - `writer`: the [`Document`] state machine, slide streams, shapes and media
//! - `parts`: part names and the generated descriptor parts
//! - `template`: static theme, master and layout parts
//! - `package`: the part manifest, archivers and staging cleanup

pub mod format;
pub mod package;
pub mod parts;
pub mod template;
pub mod writer;

pub use format::ImageFormat;
pub use package::{Archiver, Manifest, ZipArchiver};
pub use writer::{Document, DocumentState, ShapeWriter};
