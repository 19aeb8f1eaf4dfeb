//! Create document tool definition.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::core::config::Config;
use crate::core::security::resolve_output_docx_path;
use crate::docx::Document;
use crate::domains::tools::coerce::{LooseBool, bool_or};
use crate::domains::tools::definitions::common::{display_path, save_document};
use crate::domains::tools::error::{ErrorCode, ToolError};
use crate::domains::tools::handlers::DocxTool;

/// Parameters for the create document tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateDocumentParams {
    /// Path of the new .docx file. Its directory must exist.
    pub filename: String,

    /// Optional document title (core properties).
    #[serde(default)]
    pub title: Option<String>,

    /// Optional document author (core properties).
    #[serde(default)]
    pub author: Option<String>,

    /// Replace an existing file (default false).
    #[serde(default)]
    pub overwrite: Option<LooseBool>,
}

/// Writes a blank document with the built-in styles.
pub struct CreateDocumentTool;

impl DocxTool for CreateDocumentTool {
    const NAME: &'static str = "create_document";

    const DESCRIPTION: &'static str = "Create a new blank .docx document with standard styles (Normal, Title, Heading 1-9, Caption, Header, Footer), optionally setting title and author.";

    type Params = CreateDocumentParams;
    type Output = Value;

    #[instrument(skip_all, fields(filename = %params.filename))]
    fn run(params: CreateDocumentParams, config: &Config) -> Result<Value, ToolError> {
        let overwrite = bool_or(params.overwrite.as_ref(), "overwrite", false)?;
        let path = resolve_output_docx_path(&params.filename, config)?;
        if path.exists() && !overwrite {
            return Err(ToolError::new(
                ErrorCode::FileExists,
                format!("File already exists: {}", path.display()),
            )
            .with_detail("path", display_path(&path)));
        }

        let mut document = Document::new().map_err(|e| {
            ToolError::new(ErrorCode::UnexpectedError, e.to_string())
        })?;
        if let Some(title) = params.title.as_deref() {
            document.set_title(title);
        }
        if let Some(author) = params.author.as_deref() {
            document.set_author(author);
        }
        save_document(&document, &path)?;

        info!("Created document {}", path.display());

        Ok(json!({
            "path": display_path(&path),
            "title": params.title,
            "author": params.author,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn params(path: &std::path::Path, overwrite: bool) -> CreateDocumentParams {
        CreateDocumentParams {
            filename: path.to_string_lossy().to_string(),
            title: Some("Plan".to_string()),
            author: None,
            overwrite: Some(LooseBool::Bool(overwrite)),
        }
    }

    #[test]
    fn test_creates_blank_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("new.docx");

        let result = CreateDocumentTool::run(params(&path, false), &Config::default()).unwrap();
        assert_eq!(result["title"], json!("Plan"));

        let document = Document::open(&path).unwrap();
        assert_eq!(document.paragraph_count(), 0);
        assert_eq!(document.table_count(), 0);
        assert_eq!(document.section_count(), 1);
        assert_eq!(document.core_properties().title, "Plan");
    }

    #[test]
    fn test_refuses_to_overwrite_by_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("new.docx");
        CreateDocumentTool::run(params(&path, false), &Config::default()).unwrap();

        let error = CreateDocumentTool::run(params(&path, false), &Config::default()).unwrap_err();
        assert_eq!(error.code, ErrorCode::FileExists);
        assert!(CreateDocumentTool::run(params(&path, true), &Config::default()).is_ok());
    }

    #[test]
    fn test_missing_directory_is_not_created() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("new.docx");

        let error = CreateDocumentTool::run(params(&path, false), &Config::default()).unwrap_err();
        assert_eq!(error.code, ErrorCode::DirectoryNotFound);
        assert!(!temp_dir.path().join("missing").exists());
    }
}
