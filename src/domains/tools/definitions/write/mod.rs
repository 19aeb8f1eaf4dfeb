//! Document writing tools.
//!
//! - `create_document`: blank document from the built-in template
//! - `search_replace`: literal text replacement
//! - `add_paragraph`: paragraphs and headings
//! - `add_table`: tables with optional initial data

pub mod add_paragraph;
pub mod add_table;
pub mod create_document;
pub mod search_replace;

pub use add_paragraph::{AddHeadingTool, AddParagraphTool};
pub use add_table::AddTableTool;
pub use create_document::CreateDocumentTool;
pub use search_replace::SearchAndReplaceTool;
