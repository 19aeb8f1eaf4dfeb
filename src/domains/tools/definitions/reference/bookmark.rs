//! Bookmark and cross-reference tool definitions.
//!
//! Bookmark ids are one more than the largest id already in the body. Names
//! are only checked for shape; Word keeps the first of any repeated name. The
//! start marker goes directly after the paragraph properties and the end
//! marker closes the paragraph, so the whole paragraph is the bookmarked range.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::core::config::Config;
use crate::core::security::resolve_for_write;
use crate::docx::fields::{bookmark_end, bookmark_start, field_run, ref_instruction};
use crate::domains::tools::coerce::{LooseBool, LooseInt, bool_or};
use crate::domains::tools::definitions::common::{
    display_path, open_document, paragraph_index, save_document,
};
use crate::domains::tools::error::{ErrorCode, ToolError};
use crate::domains::tools::handlers::DocxTool;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the add bookmark tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddBookmarkParams {
    /// Path to the .docx file.
    pub filename: String,

    /// 0-based index among top-level paragraphs.
    pub paragraph_index: LooseInt,

    /// Letters, digits and underscores, not starting with a digit.
    pub bookmark_name: String,

    /// Write the result here instead of editing in place.
    #[serde(default)]
    pub output_filename: Option<String>,
}

/// Parameters for the insert REF field tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct InsertRefFieldParams {
    /// Path to the .docx file.
    pub filename: String,

    /// Bookmark the field points at.
    pub bookmark_name: String,

    /// Text written before the field, e.g. "See".
    #[serde(default)]
    pub prefix_text: Option<String>,

    /// Make the field a clickable link (default true).
    #[serde(default)]
    pub hyperlink: Option<LooseBool>,

    /// Write the result here instead of editing in place.
    #[serde(default)]
    pub output_filename: Option<String>,
}

/// Reject names outside `[A-Za-z_][A-Za-z0-9_]*`.
fn validate_bookmark_name(name: &str) -> Result<(), ToolError> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ToolError::new(
            ErrorCode::InvalidBookmarkName,
            "bookmark_name must match [A-Za-z_][A-Za-z0-9_]*",
        )
        .with_detail("bookmark_name", name))
    }
}

// ============================================================================
// Tool Definitions
// ============================================================================

/// Wraps one paragraph in a named bookmark.
pub struct AddBookmarkTool;

impl DocxTool for AddBookmarkTool {
    const NAME: &'static str = "add_bookmark_to_paragraph";

    const DESCRIPTION: &'static str =
        "Add a bookmark around a paragraph for REF cross-references.";

    type Params = AddBookmarkParams;
    type Output = Value;

    #[instrument(skip_all, fields(filename = %params.filename, bookmark = %params.bookmark_name))]
    fn run(params: AddBookmarkParams, config: &Config) -> Result<Value, ToolError> {
        let index = params.paragraph_index.parse("paragraph_index")?;
        validate_bookmark_name(&params.bookmark_name)?;

        let (source, destination) =
            resolve_for_write(&params.filename, params.output_filename.as_deref(), config)?;
        let mut document = open_document(&source)?;

        let position = paragraph_index(index, document.paragraph_count())?;

        let bookmark_id = document.next_bookmark_id();
        if let Some(mut paragraph) = document.paragraph_mut(position) {
            // After w:pPr rather than at index 0: paragraph properties must
            // stay the first child for the part to remain schema-valid.
            paragraph.insert_first_content(bookmark_start(bookmark_id, &params.bookmark_name));
            paragraph.push(bookmark_end(bookmark_id));
        }

        save_document(&document, &destination)?;

        info!("Bookmarked paragraph {} with id {}", position, bookmark_id);

        Ok(json!({
            "source_path": display_path(&source),
            "output_path": display_path(&destination),
            "paragraph_index": position,
            "bookmark_name": params.bookmark_name,
            "bookmark_id": bookmark_id,
        }))
    }
}

/// Appends a paragraph holding a REF field to a bookmark.
pub struct InsertRefFieldTool;

impl DocxTool for InsertRefFieldTool {
    const NAME: &'static str = "insert_ref_field";

    const DESCRIPTION: &'static str =
        "Insert a REF field to a bookmark (optionally clickable via \\h).";

    type Params = InsertRefFieldParams;
    type Output = Value;

    #[instrument(skip_all, fields(filename = %params.filename, bookmark = %params.bookmark_name))]
    fn run(params: InsertRefFieldParams, config: &Config) -> Result<Value, ToolError> {
        let hyperlink = bool_or(params.hyperlink.as_ref(), "hyperlink", true)?;
        validate_bookmark_name(&params.bookmark_name)?;

        let (source, destination) =
            resolve_for_write(&params.filename, params.output_filename.as_deref(), config)?;
        let mut document = open_document(&source)?;

        let mut paragraph = document.add_paragraph();
        if let Some(prefix) = params.prefix_text.as_deref().filter(|p| !p.is_empty()) {
            paragraph.add_run(prefix);
            paragraph.add_run(" ");
        }
        paragraph.push(field_run(&ref_instruction(&params.bookmark_name, hyperlink)));
        let paragraph_index = document.paragraph_count() - 1;

        save_document(&document, &destination)?;

        info!("Inserted REF to {} at paragraph {}", params.bookmark_name, paragraph_index);

        Ok(json!({
            "source_path": display_path(&source),
            "output_path": display_path(&destination),
            "bookmark_name": params.bookmark_name,
            "paragraph_index": paragraph_index,
            "hyperlink": hyperlink,
        }))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::Document;
    use crate::docx::fields::field_instructions;
    use crate::domains::tools::definitions::common::seed_document;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn seeded(dir: &TempDir) -> PathBuf {
        seed_document(dir.path(), "doc.docx", |doc| {
            let mut first = doc.add_paragraph();
            first.set_style("Heading1");
            first.set_text("Intro");
            doc.add_paragraph().set_text("Body");
        })
    }

    fn bookmark_params(path: &Path, index: i64, name: &str) -> AddBookmarkParams {
        AddBookmarkParams {
            filename: path.to_string_lossy().to_string(),
            paragraph_index: LooseInt::Int(index),
            bookmark_name: name.to_string(),
            output_filename: None,
        }
    }

    fn ref_params(path: &Path, name: &str) -> InsertRefFieldParams {
        InsertRefFieldParams {
            filename: path.to_string_lossy().to_string(),
            bookmark_name: name.to_string(),
            prefix_text: None,
            hyperlink: None,
            output_filename: None,
        }
    }

    #[test]
    fn test_bookmark_name_rules() {
        assert!(validate_bookmark_name("_intro2").is_ok());
        assert!(validate_bookmark_name("Section_A").is_ok());
        for name in ["", "2fast", "has space", "dash-name", "café"] {
            let error = validate_bookmark_name(name).unwrap_err();
            assert_eq!(error.code, ErrorCode::InvalidBookmarkName, "{name}");
        }
    }

    #[test]
    fn test_bookmark_ids_increase() {
        let temp_dir = TempDir::new().unwrap();
        let path = seeded(&temp_dir);

        let first = AddBookmarkTool::run(bookmark_params(&path, 0, "intro"), &Config::default()).unwrap();
        assert_eq!(first["bookmark_id"], json!(1));
        let second = AddBookmarkTool::run(bookmark_params(&path, 1, "body"), &Config::default()).unwrap();
        assert_eq!(second["bookmark_id"], json!(2));

        let document = Document::open(&path).unwrap();
        let paragraph = document.paragraphs()[0].element();
        let names: Vec<&str> = paragraph.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names.first(), Some(&"w:pPr"));
        assert_eq!(names.get(1), Some(&"w:bookmarkStart"));
        assert_eq!(names.last(), Some(&"w:bookmarkEnd"));
        assert_eq!(
            paragraph.child("w:bookmarkStart").unwrap().attr("w:name"),
            Some("intro")
        );
    }

    #[test]
    fn test_bookmark_errors() {
        let temp_dir = TempDir::new().unwrap();
        let path = seeded(&temp_dir);

        let error = AddBookmarkTool::run(bookmark_params(&path, 5, "x"), &Config::default()).unwrap_err();
        assert_eq!(error.code, ErrorCode::ParagraphIndexOutOfRange);
        assert_eq!(error.details["paragraph_count"], json!(2));

        let error = AddBookmarkTool::run(bookmark_params(&path, 0, "9lives"), &Config::default()).unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidBookmarkName);
    }

    #[test]
    fn test_repeated_name_is_accepted() {
        let temp_dir = TempDir::new().unwrap();
        let path = seeded(&temp_dir);

        AddBookmarkTool::run(bookmark_params(&path, 0, "intro"), &Config::default()).unwrap();
        let second = AddBookmarkTool::run(bookmark_params(&path, 1, "intro"), &Config::default()).unwrap();
        assert_eq!(second["bookmark_id"], json!(2));
        assert_eq!(second["paragraph_index"], json!(1));

        let document = Document::open(&path).unwrap();
        let starts = document.paragraphs()[1].element().descendants("w:bookmarkStart");
        assert_eq!(starts[0].attr("w:name"), Some("intro"));
        assert_eq!(starts[0].attr("w:id"), Some("2"));
    }

    #[test]
    fn test_ref_field_with_prefix() {
        let temp_dir = TempDir::new().unwrap();
        let path = seeded(&temp_dir);

        let mut p = ref_params(&path, "intro");
        p.prefix_text = Some("See".to_string());
        let result = InsertRefFieldTool::run(p, &Config::default()).unwrap();
        assert_eq!(result["paragraph_index"], json!(2));
        assert_eq!(result["hyperlink"], json!(true));

        let document = Document::open(&path).unwrap();
        let paragraph = document.paragraphs()[2];
        assert_eq!(paragraph.text(), "See ");
        assert_eq!(paragraph.runs().count(), 3);
        assert_eq!(field_instructions(paragraph.element()), vec![r"REF intro \h".to_string()]);
    }

    #[test]
    fn test_ref_field_without_hyperlink() {
        let temp_dir = TempDir::new().unwrap();
        let path = seeded(&temp_dir);

        let mut p = ref_params(&path, "intro");
        p.hyperlink = Some(LooseBool::Text("off".to_string()));
        InsertRefFieldTool::run(p, &Config::default()).unwrap();

        let document = Document::open(&path).unwrap();
        let paragraph = document.paragraphs()[2];
        assert_eq!(paragraph.runs().count(), 1);
        assert_eq!(field_instructions(paragraph.element()), vec!["REF intro".to_string()]);
    }
}
