//! Search and replace tool definition.
//!
//! Replacement is attempted run by run so formatting survives. When the text
//! only matches across a run boundary the whole paragraph is rewritten as one
//! plain run, which drops its run formatting.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, instrument};

use crate::core::config::Config;
use crate::core::security::resolve_for_write;
use crate::docx::ParagraphMut;
use crate::docx::table::visit_paragraphs_mut;
use crate::domains::tools::definitions::common::{display_path, open_document, save_document};
use crate::domains::tools::error::{ErrorCode, ToolError};
use crate::domains::tools::handlers::DocxTool;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the search and replace tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchReplaceParams {
    /// Path to the .docx file.
    pub filename: String,

    /// Literal text to find (case-sensitive).
    pub find_text: String,

    /// Replacement text.
    pub replace_text: String,

    /// Write the result here instead of editing in place.
    #[serde(default)]
    pub output_filename: Option<String>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Replaces text in body paragraphs and in every table cell, nested tables
/// included.
pub struct SearchAndReplaceTool;

impl DocxTool for SearchAndReplaceTool {
    const NAME: &'static str = "search_and_replace";

    const DESCRIPTION: &'static str =
        "Replace text occurrences in paragraphs and table cells, then save DOCX.";

    type Params = SearchReplaceParams;
    type Output = Value;

    #[instrument(skip_all, fields(filename = %params.filename))]
    fn run(params: SearchReplaceParams, config: &Config) -> Result<Value, ToolError> {
        if params.find_text.is_empty() {
            return Err(ToolError::new(ErrorCode::InvalidQuery, "find_text cannot be empty."));
        }

        let (source, destination) =
            resolve_for_write(&params.filename, params.output_filename.as_deref(), config)?;
        let mut document = open_document(&source)?;

        let mut replacement_count = 0;
        let mut touched_paragraphs = 0;
        visit_paragraphs_mut(document.body_mut(), &mut |element| {
            let mut paragraph = ParagraphMut::new(element);
            if let Some(count) = replace_in_paragraph(&mut paragraph, &params.find_text, &params.replace_text) {
                touched_paragraphs += 1;
                replacement_count += count;
            }
        });

        save_document(&document, &destination)?;

        info!(
            "Replaced {} occurrences in {} paragraphs",
            replacement_count, touched_paragraphs
        );

        Ok(json!({
            "source_path": display_path(&source),
            "output_path": display_path(&destination),
            "find_text": params.find_text,
            "replace_text": params.replace_text,
            "replacement_count": replacement_count,
            "touched_paragraphs": touched_paragraphs,
        }))
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Replace `find` in one paragraph. Returns `None` when the paragraph does not
/// contain it, otherwise the number of occurrences replaced.
fn replace_in_paragraph(paragraph: &mut ParagraphMut<'_>, find: &str, replace: &str) -> Option<usize> {
    let original = paragraph.text();
    if !original.contains(find) {
        return None;
    }

    let mut replaced_in_runs = 0;
    for mut run in paragraph.runs_mut() {
        let text = run.text();
        if text.contains(find) {
            replaced_in_runs += text.matches(find).count();
            run.set_text(&text.replace(find, replace));
        }
    }
    if replaced_in_runs > 0 {
        return Some(replaced_in_runs);
    }

    debug!("Match spans runs; rewriting paragraph text");
    paragraph.set_text(&original.replace(find, replace));
    Some(original.matches(find).count())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::Document;
    use crate::docx::table::{cell_paragraphs_mut, new_table, set_cell_text};
    use crate::domains::tools::definitions::common::seed_document;
    use std::path::Path;
    use tempfile::TempDir;

    fn params(path: &Path, find: &str, replace: &str, output: Option<&Path>) -> SearchReplaceParams {
        SearchReplaceParams {
            filename: path.to_string_lossy().to_string(),
            find_text: find.to_string(),
            replace_text: replace.to_string(),
            output_filename: output.map(|p| p.to_string_lossy().to_string()),
        }
    }

    #[test]
    fn test_replaces_in_runs_and_nested_tables() {
        let temp_dir = TempDir::new().unwrap();
        let path = seed_document(temp_dir.path(), "doc.docx", |doc| {
            let mut paragraph = doc.add_paragraph();
            paragraph.add_run("cat and ").format().set_bold(true);
            paragraph.add_run("cat");
            let mut table = doc.add_table(1, 1);
            let cell = table.cell_mut(0, 0).unwrap();
            set_cell_text(cell, "a cat");
            let mut nested = new_table(1, 1, 2000);
            set_cell_text(
                nested.child_mut("w:tr").unwrap().child_mut("w:tc").unwrap(),
                "nested cat",
            );
            cell.push(nested);
        });

        let result = SearchAndReplaceTool::run(params(&path, "cat", "dog", None), &Config::default()).unwrap();
        assert_eq!(result["replacement_count"], json!(4));
        assert_eq!(result["touched_paragraphs"], json!(3));

        let document = Document::open(&path).unwrap();
        let paragraph = document.paragraphs()[0];
        assert_eq!(paragraph.text(), "dog and dog");
        assert!(paragraph.runs().next().unwrap().child("w:rPr").is_some());

        let mut document = document;
        let mut table = document.table_mut(0).unwrap();
        let cell = table.cell_mut(0, 0).unwrap();
        let texts: Vec<String> = cell_paragraphs_mut(cell).map(|p| p.text()).collect();
        assert_eq!(texts, vec!["a dog".to_string()]);
        let nested_text = cell.child("w:tbl").unwrap().descendants("w:t")[0].text();
        assert_eq!(nested_text, "nested dog");
    }

    #[test]
    fn test_match_across_runs_loses_formatting() {
        let temp_dir = TempDir::new().unwrap();
        let path = seed_document(temp_dir.path(), "doc.docx", |doc| {
            let mut paragraph = doc.add_paragraph();
            paragraph.add_run("Hel").format().set_bold(true);
            paragraph.add_run("lo world");
        });

        let result = SearchAndReplaceTool::run(params(&path, "Hello", "Goodbye", None), &Config::default()).unwrap();
        assert_eq!(result["replacement_count"], json!(1));

        let document = Document::open(&path).unwrap();
        let paragraph = document.paragraphs()[0];
        assert_eq!(paragraph.text(), "Goodbye world");
        let runs: Vec<_> = paragraph.runs().collect();
        assert_eq!(runs.len(), 1);
        assert!(runs[0].child("w:rPr").is_none());
    }

    #[test]
    fn test_absent_text_leaves_body_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let path = seed_document(temp_dir.path(), "doc.docx", |doc| {
            doc.add_paragraph().set_text("Nothing to see");
        });
        let before = Document::open(&path).unwrap().paragraphs()[0].element().to_xml_string();

        let result = SearchAndReplaceTool::run(params(&path, "zebra", "x", None), &Config::default()).unwrap();
        assert_eq!(result["replacement_count"], json!(0));
        assert_eq!(result["touched_paragraphs"], json!(0));

        let after = Document::open(&path).unwrap().paragraphs()[0].element().to_xml_string();
        assert_eq!(before, after);
    }

    #[test]
    fn test_output_filename_keeps_source() {
        let temp_dir = TempDir::new().unwrap();
        let path = seed_document(temp_dir.path(), "doc.docx", |doc| {
            doc.add_paragraph().set_text("old");
        });
        let output = temp_dir.path().join("copy.docx");

        SearchAndReplaceTool::run(params(&path, "old", "new", Some(&output)), &Config::default()).unwrap();

        assert_eq!(Document::open(&path).unwrap().paragraphs()[0].text(), "old");
        assert_eq!(Document::open(&output).unwrap().paragraphs()[0].text(), "new");
    }

    #[test]
    fn test_empty_find_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = seed_document(temp_dir.path(), "doc.docx", |_| {});
        let error = SearchAndReplaceTool::run(params(&path, "", "x", None), &Config::default()).unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidQuery);
    }
}
