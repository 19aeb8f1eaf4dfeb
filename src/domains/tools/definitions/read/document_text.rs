//! Document text tool definition.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::core::config::Config;
use crate::core::security::resolve_docx_path;
use crate::docx::{Block, Document, Table};
use crate::docx::table::cell_text;
use crate::domains::tools::definitions::common::{display_path, open_document};
use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::DocxTool;

/// Parameters shared by the tools that only read one document.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DocumentParams {
    /// Path to the .docx file.
    pub filename: String,
}

/// Non-blank trimmed lines in body order: each paragraph, then every cell of
/// each top-level table row by row.
pub fn text_lines(document: &Document) -> Vec<String> {
    let mut lines = Vec::new();
    let mut push = |text: String| {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    };
    for block in document.blocks() {
        match block {
            Block::Paragraph(paragraph) => push(paragraph.text()),
            Block::Table(table) => {
                for row in table.rows() {
                    for cell in Table::cells(row) {
                        push(cell_text(cell));
                    }
                }
            }
        }
    }
    lines
}

/// Extracts the plain text of a document.
pub struct GetDocumentTextTool;

impl DocxTool for GetDocumentTextTool {
    const NAME: &'static str = "get_document_text";

    const DESCRIPTION: &'static str = "Extract plain text lines from a .docx file.";

    type Params = DocumentParams;
    type Output = Value;

    #[instrument(skip_all, fields(filename = %params.filename))]
    fn run(params: DocumentParams, config: &Config) -> Result<Value, ToolError> {
        let path = resolve_docx_path(&params.filename, config)?;
        let document = open_document(&path)?;
        let lines = text_lines(&document);

        info!("Extracted {} lines from {}", lines.len(), path.display());

        Ok(json!({
            "path": display_path(&path),
            "text": lines.join("\n"),
            "line_count": lines.len(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::table::set_cell_text;
    use crate::domains::tools::definitions::common::seed_document;
    use crate::domains::tools::error::ErrorCode;
    use tempfile::TempDir;

    #[test]
    fn test_text_includes_table_cells_in_body_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = seed_document(temp_dir.path(), "doc.docx", |doc| {
            doc.add_paragraph().set_text("Intro");
            doc.add_paragraph().set_text("   ");
            let mut table = doc.add_table(1, 2);
            set_cell_text(table.cell_mut(0, 0).unwrap(), " left ");
            set_cell_text(table.cell_mut(0, 1).unwrap(), "right");
            doc.add_paragraph().set_text("Outro");
        });

        let params = DocumentParams {
            filename: path.to_string_lossy().to_string(),
        };
        let result = GetDocumentTextTool::run(params, &Config::default()).unwrap();

        assert_eq!(result["text"], json!("Intro\nleft\nright\nOutro"));
        assert_eq!(result["line_count"], json!(4));
    }

    #[test]
    fn test_wrong_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        std::fs::write(&path, "plain").unwrap();

        let params = DocumentParams {
            filename: path.to_string_lossy().to_string(),
        };
        let error = GetDocumentTextTool::run(params, &Config::default()).unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidExtension);
    }
}
