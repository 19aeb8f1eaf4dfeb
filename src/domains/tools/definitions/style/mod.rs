//! Formatting tools.
//!
//! - `format_table`: borders, header row and banded shading
//! - `set_paragraph_format`: paragraph and run formatting on selected paragraphs
//! - `apply_document_style`: page setup plus Normal and Heading styles

pub mod document_style;
pub mod format_table;
pub mod paragraph_format;

pub use document_style::ApplyDocumentStyleTool;
pub use format_table::FormatTableTool;
pub use paragraph_format::SetParagraphFormatTool;
