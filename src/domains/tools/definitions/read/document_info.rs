//! Document info tool definition.

use serde::Serialize;
use tracing::{info, instrument};

use super::document_text::{DocumentParams, text_lines};
use crate::core::config::Config;
use crate::core::security::resolve_docx_path;
use crate::domains::tools::definitions::common::{display_path, open_document};
use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::DocxTool;

/// Metadata and statistics of one document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentInfo {
    pub path: String,
    pub title: String,
    pub author: String,
    pub subject: String,
    pub keywords: String,
    pub created: Option<String>,
    pub modified: Option<String>,
    pub last_modified_by: String,
    pub revision: i64,
    pub paragraph_count: usize,
    pub table_count: usize,
    pub section_count: usize,
    pub word_count: usize,
    pub line_count: usize,
}

/// Reads core properties and counts paragraphs, tables, sections and words.
pub struct GetDocumentInfoTool;

impl DocxTool for GetDocumentInfoTool {
    const NAME: &'static str = "get_document_info";

    const DESCRIPTION: &'static str =
        "Read document metadata and basic statistics from a .docx file.";

    type Params = DocumentParams;
    type Output = DocumentInfo;

    #[instrument(skip_all, fields(filename = %params.filename))]
    fn run(params: DocumentParams, config: &Config) -> Result<DocumentInfo, ToolError> {
        let path = resolve_docx_path(&params.filename, config)?;
        let document = open_document(&path)?;
        let core = document.core_properties();
        let lines = text_lines(&document);

        info!("Read info for {}", path.display());

        Ok(DocumentInfo {
            path: display_path(&path),
            title: core.title,
            author: core.author,
            subject: core.subject,
            keywords: core.keywords,
            created: core.created.map(|ts| ts.to_rfc3339()),
            modified: core.modified.map(|ts| ts.to_rfc3339()),
            last_modified_by: core.last_modified_by,
            revision: core.revision,
            paragraph_count: document.paragraph_count(),
            table_count: document.table_count(),
            section_count: document.section_count(),
            word_count: lines.join(" ").split_whitespace().count(),
            line_count: lines.len(),
        })
    }
}
