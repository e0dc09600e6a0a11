/// Error types for the export pipeline.
use crate::geometry::PathError;
use thiserror::Error;

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Error types for export operations.
#[derive(Error, Debug)]
pub enum ExportError {
    /// IO error while staging or cleaning up
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed path opcode stream
    #[error("Path error: {0}")]
    Path(#[from] PathError),

    /// Geometry that cannot be mapped onto a slide
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Operation not allowed in the document's current state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Raster encoding failed
    #[error("Encode error: {0}")]
    Encode(String),

    /// Archiver failed
    #[error("Archive error: {0}")]
    Archive(String),

    /// Invalid export options
    #[error("Config error: {0}")]
    Config(String),

    /// Markup formatting error
    #[error("XML error: {0}")]
    Xml(String),
}

impl From<std::fmt::Error> for ExportError {
    fn from(err: std::fmt::Error) -> Self {
        ExportError::Xml(err.to_string())
    }
}

impl From<image::ImageError> for ExportError {
    fn from(err: image::ImageError) -> Self {
        ExportError::Encode(err.to_string())
    }
}

impl From<zip::result::ZipError> for ExportError {
    fn from(err: zip::result::ZipError) -> Self {
        ExportError::Archive(err.to_string())
    }
}
