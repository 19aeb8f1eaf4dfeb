//! Document outline tool definition.

use serde::Serialize;
use tracing::{info, instrument};

use super::document_text::DocumentParams;
use crate::core::config::Config;
use crate::core::security::resolve_docx_path;
use crate::docx::Table;
use crate::docx::table::cell_text;
use crate::domains::tools::definitions::common::{display_path, open_document};
use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::DocxTool;

const PREVIEW_ROWS: usize = 3;
const PREVIEW_COLS: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct ParagraphOutline {
    pub index: usize,
    pub text: String,
    pub style_id: Option<String>,
    pub style_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableOutline {
    pub index: usize,
    pub rows: usize,
    pub columns: usize,
    pub preview: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentOutline {
    pub path: String,
    pub paragraphs: Vec<ParagraphOutline>,
    pub tables: Vec<TableOutline>,
}

fn preview(table: &Table<'_>) -> Vec<Vec<String>> {
    table
        .rows()
        .into_iter()
        .take(PREVIEW_ROWS)
        .map(|row| {
            Table::cells(row)
                .into_iter()
                .take(PREVIEW_COLS)
                .map(|cell| cell_text(cell).trim().to_string())
                .collect()
        })
        .collect()
}

/// Lists every top-level paragraph with its style and every table with a
/// small preview.
pub struct GetDocumentOutlineTool;

impl DocxTool for GetDocumentOutlineTool {
    const NAME: &'static str = "get_document_outline";

    const DESCRIPTION: &'static str = "Extract paragraph/table outline from a .docx file.";

    type Params = DocumentParams;
    type Output = DocumentOutline;

    #[instrument(skip_all, fields(filename = %params.filename))]
    fn run(params: DocumentParams, config: &Config) -> Result<DocumentOutline, ToolError> {
        let path = resolve_docx_path(&params.filename, config)?;
        let document = open_document(&path)?;
        let styles = document.styles();

        let paragraphs: Vec<ParagraphOutline> = document
            .paragraphs()
            .iter()
            .enumerate()
            .map(|(index, paragraph)| {
                ParagraphOutline {
                    index,
                    text: paragraph.text().trim().to_string(),
                    style_id: styles.paragraph_style_id(paragraph.style_id()),
                    style_name: styles.paragraph_style_name(paragraph.style_id()),
                }
            })
            .collect();

        let tables: Vec<TableOutline> = document
            .tables()
            .iter()
            .enumerate()
            .map(|(index, table)| TableOutline {
                index,
                rows: table.row_count(),
                columns: table.column_count(),
                preview: preview(table),
            })
            .collect();

        info!(
            "Outline of {}: {} paragraphs, {} tables",
            path.display(),
            paragraphs.len(),
            tables.len()
        );

        Ok(DocumentOutline {
            path: display_path(&path),
            paragraphs,
            tables,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::table::set_cell_text;
    use crate::domains::tools::definitions::common::seed_document;
    use tempfile::TempDir;

    #[test]
    fn test_outline_styles_and_preview() {
        let temp_dir = TempDir::new().unwrap();
        let path = seed_document(temp_dir.path(), "doc.docx", |doc| {
            let mut heading = doc.add_paragraph();
            heading.set_text("Overview");
            heading.set_style("Heading1");
            doc.add_paragraph().set_text(" body ");
            let mut orphan = doc.add_paragraph();
            orphan.set_text("orphan");
            orphan.set_style("NoSuchStyle");

            let mut table = doc.add_table(4, 5);
            for row in 0..4 {
                for col in 0..5 {
                    set_cell_text(table.cell_mut(row, col).unwrap(), &format!("r{row}c{col}"));
                }
            }
        });

        let params = DocumentParams {
            filename: path.to_string_lossy().to_string(),
        };
        let outline = GetDocumentOutlineTool::run(params, &Config::default()).unwrap();

        assert_eq!(outline.paragraphs.len(), 3);
        assert_eq!(outline.paragraphs[0].style_id.as_deref(), Some("Heading1"));
        assert_eq!(outline.paragraphs[0].style_name, "Heading 1");
        assert_eq!(outline.paragraphs[1].text, "body");
        assert_eq!(outline.paragraphs[1].style_name, "Normal");
        assert_eq!(outline.paragraphs[2].style_id.as_deref(), Some("Normal"));
        assert_eq!(outline.paragraphs[2].style_name, "Normal");

        let table = &outline.tables[0];
        assert_eq!((table.rows, table.columns), (4, 5));
        assert_eq!(table.preview.len(), 3);
        assert!(table.preview.iter().all(|row| row.len() == 3));
        assert_eq!(table.preview[2][2], "r2c2");
    }
}
