//! Tool error type and the response envelope.
//!
//! Every failure a tool reports carries a stable machine-readable code, a
//! human-readable message, and a details object with the offending input.

use serde::Serialize;
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::core::security::PathSecurityError;

/// Stable error codes reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    DirectoryNotFound,
    NotADirectory,
    FileNotFound,
    NotAFile,
    InvalidExtension,
    FileExists,
    PathOutsideRoot,
    InvalidArguments,
    InvalidBoolean,
    InvalidInteger,
    InvalidNumber,
    InvalidParagraphIndices,
    InvalidMatrix,
    InvalidShading,
    InvalidAutoFit,
    InvalidColor,
    InvalidFontSize,
    InvalidAlignment,
    InvalidLineSpacing,
    InvalidPageSize,
    InvalidHeadingLevel,
    InvalidHeadingRange,
    InvalidBorderStyle,
    InvalidPageNumber,
    InvalidTableDimensions,
    InvalidQuery,
    InvalidLabel,
    InvalidCaptionText,
    InvalidSequence,
    InvalidBookmarkName,
    StyleNotFound,
    TableIndexOutOfRange,
    ParagraphIndexOutOfRange,
    SectionIndexOutOfRange,
    MissingSelector,
    DocxOpenFailed,
    DocxSaveFailed,
    UnexpectedError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DirectoryNotFound => "DIRECTORY_NOT_FOUND",
            Self::NotADirectory => "NOT_A_DIRECTORY",
            Self::FileNotFound => "FILE_NOT_FOUND",
            Self::NotAFile => "NOT_A_FILE",
            Self::InvalidExtension => "INVALID_EXTENSION",
            Self::FileExists => "FILE_EXISTS",
            Self::PathOutsideRoot => "PATH_OUTSIDE_ROOT",
            Self::InvalidArguments => "INVALID_ARGUMENTS",
            Self::InvalidBoolean => "INVALID_BOOLEAN",
            Self::InvalidInteger => "INVALID_INTEGER",
            Self::InvalidNumber => "INVALID_NUMBER",
            Self::InvalidParagraphIndices => "INVALID_PARAGRAPH_INDICES",
            Self::InvalidMatrix => "INVALID_MATRIX",
            Self::InvalidShading => "INVALID_SHADING",
            Self::InvalidAutoFit => "INVALID_AUTO_FIT",
            Self::InvalidColor => "INVALID_COLOR",
            Self::InvalidFontSize => "INVALID_FONT_SIZE",
            Self::InvalidAlignment => "INVALID_ALIGNMENT",
            Self::InvalidLineSpacing => "INVALID_LINE_SPACING",
            Self::InvalidPageSize => "INVALID_PAGE_SIZE",
            Self::InvalidHeadingLevel => "INVALID_HEADING_LEVEL",
            Self::InvalidHeadingRange => "INVALID_HEADING_RANGE",
            Self::InvalidBorderStyle => "INVALID_BORDER_STYLE",
            Self::InvalidPageNumber => "INVALID_PAGE_NUMBER",
            Self::InvalidTableDimensions => "INVALID_TABLE_DIMENSIONS",
            Self::InvalidQuery => "INVALID_QUERY",
            Self::InvalidLabel => "INVALID_LABEL",
            Self::InvalidCaptionText => "INVALID_CAPTION_TEXT",
            Self::InvalidSequence => "INVALID_SEQUENCE",
            Self::InvalidBookmarkName => "INVALID_BOOKMARK_NAME",
            Self::StyleNotFound => "STYLE_NOT_FOUND",
            Self::TableIndexOutOfRange => "TABLE_INDEX_OUT_OF_RANGE",
            Self::ParagraphIndexOutOfRange => "PARAGRAPH_INDEX_OUT_OF_RANGE",
            Self::SectionIndexOutOfRange => "SECTION_INDEX_OUT_OF_RANGE",
            Self::MissingSelector => "MISSING_SELECTOR",
            Self::DocxOpenFailed => "DOCX_OPEN_FAILED",
            Self::DocxSaveFailed => "DOCX_SAVE_FAILED",
            Self::UnexpectedError => "UNEXPECTED_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured tool failure.
#[derive(Debug, Clone, Error, Serialize)]
#[error("{code}: {message}")]
pub struct ToolError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Map<String, Value>,
}

impl ToolError {
    /// Create an error with empty details.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Map::new(),
        }
    }

    /// Attach one detail entry.
    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    /// An input-validation failure naming the field and echoing its raw value.
    pub fn invalid_field(
        code: ErrorCode,
        field: &str,
        value: impl Into<Value>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(code, message)
            .with_detail("field", field)
            .with_detail("value", value)
    }

    /// Failure envelope: `{ok: false, error: {code, message, details}}`.
    pub fn to_envelope(&self) -> Value {
        json!({
            "ok": false,
            "error": {
                "code": self.code,
                "message": self.message,
                "details": self.details,
            }
        })
    }
}

impl From<PathSecurityError> for ToolError {
    fn from(error: PathSecurityError) -> Self {
        let code = match &error {
            PathSecurityError::DirectoryNotFound { .. }
            | PathSecurityError::OutputDirectoryNotFound { .. } => ErrorCode::DirectoryNotFound,
            // Every I/O failure comes from a directory lookup: the working
            // directory, the configured root, or the directory being listed.
            PathSecurityError::IoError { error: io_error, .. }
                if io_error.kind() == std::io::ErrorKind::NotFound =>
            {
                ErrorCode::DirectoryNotFound
            }
            PathSecurityError::IoError { .. } => ErrorCode::UnexpectedError,
            PathSecurityError::NotADirectory { .. } => ErrorCode::NotADirectory,
            PathSecurityError::FileNotFound { .. } => ErrorCode::FileNotFound,
            PathSecurityError::NotAFile { .. } => ErrorCode::NotAFile,
            PathSecurityError::InvalidExtension { .. } => ErrorCode::InvalidExtension,
            PathSecurityError::OutsideRootDirectory { .. } => ErrorCode::PathOutsideRoot,
        };
        let mut tool_error = Self::new(code, error.to_string())
            .with_detail("path", error.path().to_string_lossy().to_string());
        if let PathSecurityError::OutsideRootDirectory { root, .. } = &error {
            tool_error = tool_error.with_detail("root", root.to_string_lossy().to_string());
        }
        if let PathSecurityError::IoError { error: io_error, .. } = &error {
            tool_error = tool_error.with_detail("error", io_error.to_string());
        }
        tool_error
    }
}

/// Success envelope: `{ok: true, result}`.
pub fn success_envelope(result: Value) -> Value {
    json!({ "ok": true, "result": result })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_serialize_screaming_snake_case() {
        for code in [
            ErrorCode::NotADirectory,
            ErrorCode::InvalidAutoFit,
            ErrorCode::DocxOpenFailed,
            ErrorCode::ParagraphIndexOutOfRange,
        ] {
            assert_eq!(serde_json::to_value(code).unwrap(), json!(code.as_str()));
        }
    }

    #[test]
    fn test_failure_envelope_shape() {
        let error = ToolError::invalid_field(ErrorCode::InvalidBoolean, "bold", "maybe", "bold must be boolean-like.");
        let envelope = error.to_envelope();
        assert_eq!(envelope["ok"], json!(false));
        assert_eq!(envelope["error"]["code"], json!("INVALID_BOOLEAN"));
        assert_eq!(envelope["error"]["details"]["field"], json!("bold"));
        assert_eq!(envelope["error"]["details"]["value"], json!("maybe"));
        assert_eq!(error.to_string(), "INVALID_BOOLEAN: bold must be boolean-like.");
    }

    #[test]
    fn test_path_errors_map_to_codes() {
        let error: ToolError = PathSecurityError::OutputDirectoryNotFound {
            path: "/missing".into(),
        }
        .into();
        assert_eq!(error.code, ErrorCode::DirectoryNotFound);
        assert_eq!(error.details["path"], json!("/missing"));

        let error: ToolError = PathSecurityError::OutsideRootDirectory {
            path: "/etc/a.docx".into(),
            root: "/srv".into(),
        }
        .into();
        assert_eq!(error.code, ErrorCode::PathOutsideRoot);
        assert_eq!(error.details["root"], json!("/srv"));
    }

    #[test]
    fn test_io_errors_map_by_kind() {
        use std::io;

        let missing: ToolError = PathSecurityError::IoError {
            path: "/srv/root".into(),
            error: io::Error::new(io::ErrorKind::NotFound, "gone"),
        }
        .into();
        assert_eq!(missing.code, ErrorCode::DirectoryNotFound);
        assert_eq!(missing.details["error"], json!("gone"));

        let denied: ToolError = PathSecurityError::IoError {
            path: "/srv/locked".into(),
            error: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        }
        .into();
        assert_eq!(denied.code, ErrorCode::UnexpectedError);
        assert_eq!(denied.details["path"], json!("/srv/locked"));
    }

    #[test]
    fn test_success_envelope_shape() {
        let envelope = success_envelope(json!({"count": 2}));
        assert_eq!(envelope, json!({"ok": true, "result": {"count": 2}}));
    }
}
