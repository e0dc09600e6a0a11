//! Export options.
//!
//! Options can be built in code or read from YAML:
//!
//! ```rust
//! use canvas_pptx::config::{ExportOptions, StrokeAlphaPolicy};
//!
//! let options = ExportOptions::from_yaml_str("stroke_alpha: keep_computed\nutf8_mode: true\n").unwrap();
//! assert_eq!(options.stroke_alpha, StrokeAlphaPolicy::KeepComputed);
//! assert!(options.utf8_mode);
//! assert_eq!(options.legacy_encoding, "iso-8859-1");
//! ```

use crate::common::encoding::{DEFAULT_LEGACY_ENCODING, TextEncoder, encoding_for_label};
use crate::ooxml::error::{ExportError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Stroke opacity of shapes that also carry a fill.
///
/// Presentation renderers draw a translucent outline over a filled interior
/// with visible seams, so by default the outline of a filled shape is made
/// opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrokeAlphaPolicy {
    /// Outline alpha becomes 255 whenever the shape has a visible fill
    #[default]
    ForceOpaqueWhenFilled,
    /// Outline keeps the alpha of the foreground colour
    KeepComputed,
}

/// Options of a document export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub stroke_alpha: StrokeAlphaPolicy,
    /// Text bytes are UTF-8 rather than `legacy_encoding`
    pub utf8_mode: bool,
    /// WHATWG label of the encoding of non-UTF-8 text
    pub legacy_encoding: String,
    /// Directory the staging tree is created in; the system temp dir if unset
    pub staging_parent: Option<PathBuf>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            stroke_alpha: StrokeAlphaPolicy::default(),
            utf8_mode: false,
            legacy_encoding: DEFAULT_LEGACY_ENCODING.to_string(),
            staging_parent: None,
        }
    }
}

impl ExportOptions {
    /// Parse and validate options from a YAML document. Missing keys take
    /// their default.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let options: Self = serde_saphyr::from_str(yaml)
            .map_err(|e| ExportError::Config(format!("Failed to parse export options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Serialize to YAML.
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_saphyr::to_string(self)
            .map_err(|e| ExportError::Config(format!("Failed to serialize export options: {}", e)))
    }

    /// Check the option values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        encoding_for_label(&self.legacy_encoding)?;
        if let Some(parent) = &self.staging_parent
            && !parent.is_dir()
        {
            return Err(ExportError::Config(format!(
                "staging parent {} is not a directory",
                parent.display()
            )));
        }
        Ok(())
    }

    /// Text normaliser for these options.
    pub fn text_encoder(&self) -> Result<TextEncoder> {
        Ok(TextEncoder::new(encoding_for_label(&self.legacy_encoding)?, self.utf8_mode))
    }
}
