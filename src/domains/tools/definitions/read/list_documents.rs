//! List documents tool definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::core::config::Config;
use crate::core::security::{list_docx_files, resolve_directory};
use crate::domains::tools::definitions::common::display_path;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::DocxTool;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the list documents tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListDocumentsParams {
    /// Directory to scan. Defaults to the configured documents directory or
    /// the current working directory.
    #[serde(default)]
    pub directory: Option<String>,
}

/// One `.docx` file in the listing.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentEntry {
    pub name: String,
    pub path: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentListing {
    pub directory: String,
    pub documents: Vec<DocumentEntry>,
    pub count: usize,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Lists `.docx` files directly inside a directory.
pub struct ListAvailableDocumentsTool;

impl DocxTool for ListAvailableDocumentsTool {
    const NAME: &'static str = "list_available_documents";

    const DESCRIPTION: &'static str =
        "List .docx files under the given directory (or current working directory).";

    type Params = ListDocumentsParams;
    type Output = DocumentListing;

    #[instrument(skip_all, fields(directory = ?params.directory))]
    fn run(params: ListDocumentsParams, config: &Config) -> Result<DocumentListing, ToolError> {
        let directory = resolve_directory(params.directory.as_deref(), config)?;
        let documents: Vec<DocumentEntry> = list_docx_files(&directory)?
            .into_iter()
            .map(|path| DocumentEntry {
                name: path
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_default(),
                size_bytes: path.metadata().map(|m| m.len()).unwrap_or(0),
                path: display_path(&path),
            })
            .collect();

        info!("Found {} documents in {}", documents.len(), directory.display());

        Ok(DocumentListing {
            directory: display_path(&directory),
            count: documents.len(),
            documents,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::common::seed_document;
    use crate::domains::tools::error::ErrorCode;
    use crate::domains::tools::handlers::envelope_of;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_lists_only_docx_files() {
        let temp_dir = TempDir::new().unwrap();
        seed_document(temp_dir.path(), "b.docx", |_| {});
        seed_document(temp_dir.path(), "A.docx", |_| {});
        fs::write(temp_dir.path().join("notes.txt"), "x").unwrap();

        let params = ListDocumentsParams {
            directory: Some(temp_dir.path().to_string_lossy().to_string()),
        };
        let listing = ListAvailableDocumentsTool::run(params, &Config::default()).unwrap();

        assert_eq!(listing.count, 2);
        assert_eq!(listing.documents[0].name, "A.docx");
        assert_eq!(listing.documents[1].name, "b.docx");
        assert!(listing.documents[0].size_bytes > 0);
    }

    #[test]
    fn test_missing_directory() {
        let params = ListDocumentsParams {
            directory: Some("/nonexistent/path/12345".to_string()),
        };
        let error = ListAvailableDocumentsTool::run(params, &Config::default()).unwrap_err();
        assert_eq!(error.code, ErrorCode::DirectoryNotFound);
    }

    #[test]
    fn test_call_returns_envelope() {
        let temp_dir = TempDir::new().unwrap();
        let args = json!({ "directory": temp_dir.path().to_string_lossy() });
        let result = ListAvailableDocumentsTool::call(args, &Config::default());

        let envelope = envelope_of(&result);
        assert_eq!(envelope["ok"], json!(true));
        assert_eq!(envelope["result"]["count"], json!(0));
    }
}
