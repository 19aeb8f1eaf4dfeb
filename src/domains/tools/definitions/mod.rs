//! Tool definitions module.
//!
//! Tools are grouped by what they touch. Each tool lives in its own file and
//! implements [`DocxTool`](crate::domains::tools::DocxTool).

pub mod common;
pub mod read;
pub mod reference;
pub mod section;
pub mod style;
pub mod write;

pub use read::{
    FindTextInDocumentTool, GetDocumentInfoTool, GetDocumentOutlineTool, GetDocumentTextTool,
    ListAvailableDocumentsTool,
};
pub use reference::{
    AddBookmarkTool, AddSequenceCaptionTool, InsertRefFieldTool, InsertTableOfContentsTool,
};
pub use section::SetHeadersFootersTool;
pub use style::{ApplyDocumentStyleTool, FormatTableTool, SetParagraphFormatTool};
pub use write::{
    AddHeadingTool, AddParagraphTool, AddTableTool, CreateDocumentTool, SearchAndReplaceTool,
};
