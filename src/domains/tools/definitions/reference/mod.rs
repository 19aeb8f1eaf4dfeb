//! Field and cross-reference tools.
//!
//! - `insert_table_of_contents`: TOC field with optional title
//! - `add_sequence_caption`: numbered SEQ captions
//! - `add_bookmark_to_paragraph` / `insert_ref_field`: bookmarks and REF fields

pub mod bookmark;
pub mod sequence_caption;
pub mod table_of_contents;

pub use bookmark::{AddBookmarkTool, InsertRefFieldTool};
pub use sequence_caption::AddSequenceCaptionTool;
pub use table_of_contents::InsertTableOfContentsTool;
