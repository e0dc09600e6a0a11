//! Office Open XML (OOXML) output.
//!
//! 1. **OPC Layer** (`opc`): content types, namespaces and relationship types
//! 2. **Errors** (`error`): the error type shared by every export stage
//! 3. **PresentationML** (`pptx`): the presentation package writer

pub mod error;
pub mod opc;
pub mod pptx;

pub use error::{ExportError, Result};
