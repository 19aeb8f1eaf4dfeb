//! Errors raised while reading or writing a .docx package.

use thiserror::Error;

/// Result type for document package operations.
pub type DocxResult<T> = Result<T, DocxError>;

/// Errors that can occur while loading, editing or saving a document package.
#[derive(Debug, Error)]
pub enum DocxError {
    /// The zip container could not be read or written.
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A part contained malformed XML.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An attribute in a part could not be decoded.
    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// I/O failure on the package file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A part's bytes were not valid UTF-8.
    #[error("Part '{part}' is not valid UTF-8")]
    Encoding { part: String },

    /// A required part is absent from the package.
    #[error("Missing part: {0}")]
    MissingPart(String),

    /// The XML structure did not match what a WordprocessingML part requires.
    #[error("Malformed part '{part}': {reason}")]
    Malformed { part: String, reason: String },
}

impl DocxError {
    /// Create a malformed-part error.
    pub fn malformed(part: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            part: part.into(),
            reason: reason.into(),
        }
    }
}
