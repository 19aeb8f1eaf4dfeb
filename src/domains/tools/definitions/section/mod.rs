//! Section layout tools.
//!
//! - `set_headers_footers`: header and footer text, PAGE fields and page numbering

pub mod headers_footers;

pub use headers_footers::SetHeadersFootersTool;
