//! Read-only document tools.
//!
//! - `list_documents`: list .docx files in a directory
//! - `document_info`: core properties and statistics
//! - `document_text`: plain text lines
//! - `outline`: paragraphs with styles and table previews
//! - `find_text`: literal search with context

pub mod document_info;
pub mod document_text;
pub mod find_text;
pub mod list_documents;
pub mod outline;

pub use document_info::GetDocumentInfoTool;
pub use document_text::GetDocumentTextTool;
pub use find_text::FindTextInDocumentTool;
pub use list_documents::ListAvailableDocumentsTool;
pub use outline::GetDocumentOutlineTool;
