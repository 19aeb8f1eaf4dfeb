//! WordprocessingML document model.
//!
//! A .docx file is a zip package of XML parts. This module reads the package,
//! parses the parts the tools edit into an owned element tree, and exposes a
//! structured layer (paragraphs, runs, tables, sections, styles, headers and
//! footers, core properties) on top of it. Everything it does not understand
//! is written back unchanged.

pub mod document;
pub mod error;
pub mod fields;
pub mod format;
pub mod package;
pub mod paragraph;
pub mod schema;
pub mod styles;
pub mod table;
pub mod template;
pub mod units;
pub mod xml;

pub use document::{Block, CoreProperties, Document, Margins, SectionMut, StoryKind};
pub use error::{DocxError, DocxResult};
pub use format::{Alignment, ParagraphFormat, RunFormat};
pub use paragraph::{Paragraph, ParagraphMut, RunMut};
pub use styles::Styles;
pub use table::{Table, TableMut};
pub use xml::XmlElement;
