//! Add paragraph and add heading tool definitions.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::core::config::Config;
use crate::core::security::resolve_for_write;
use crate::docx::Document;
use crate::domains::tools::coerce::{LooseBool, LooseInt, LooseNumber, bool_or, int_or, optional_number};
use crate::domains::tools::definitions::common::{
    RunStyle, display_path, only_if_set, open_document, resolve_style, save_document,
};
use crate::domains::tools::error::{ErrorCode, ToolError};
use crate::domains::tools::handlers::DocxTool;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the add paragraph tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddParagraphParams {
    /// Path to the .docx file.
    pub filename: String,

    /// Paragraph text.
    pub text: String,

    /// Paragraph style name, e.g. "Normal" or "Heading 2".
    #[serde(default)]
    pub style: Option<String>,

    #[serde(default)]
    pub font_name: Option<String>,

    /// Font size in points.
    #[serde(default)]
    pub font_size: Option<LooseNumber>,

    #[serde(default)]
    pub bold: Option<LooseBool>,

    #[serde(default)]
    pub italic: Option<LooseBool>,

    /// Hex RGB color such as "1A2B3C".
    #[serde(default)]
    pub color: Option<String>,

    /// Write the result here instead of editing in place.
    #[serde(default)]
    pub output_filename: Option<String>,
}

/// Parameters for the add heading tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddHeadingParams {
    /// Path to the .docx file.
    pub filename: String,

    /// Heading text.
    pub text: String,

    /// Heading level 0-9; 0 uses the Title style (default 1).
    #[serde(default)]
    pub level: Option<LooseInt>,

    #[serde(default)]
    pub font_name: Option<String>,

    /// Font size in points.
    #[serde(default)]
    pub font_size: Option<LooseNumber>,

    #[serde(default)]
    pub bold: Option<LooseBool>,

    #[serde(default)]
    pub italic: Option<LooseBool>,

    /// Write the result here instead of editing in place.
    #[serde(default)]
    pub output_filename: Option<String>,
}

// ============================================================================
// Tool Definitions
// ============================================================================

/// Append a styled paragraph and format its run. Returns the new paragraph index.
fn append_paragraph(
    document: &mut Document,
    text: &str,
    style_id: Option<&str>,
    run_style: &RunStyle,
) -> usize {
    let mut paragraph = document.add_paragraph();
    paragraph.set_text(text);
    if let Some(style_id) = style_id {
        paragraph.set_style(style_id);
    }
    if let Some(mut run) = paragraph.first_run_mut() {
        run_style.apply(&mut run);
    }
    document.paragraph_count() - 1
}

/// Appends a paragraph at the end of the body.
pub struct AddParagraphTool;

impl DocxTool for AddParagraphTool {
    const NAME: &'static str = "add_paragraph";

    const DESCRIPTION: &'static str =
        "Append a paragraph to document with optional style and font formatting.";

    type Params = AddParagraphParams;
    type Output = Value;

    #[instrument(skip_all, fields(filename = %params.filename))]
    fn run(params: AddParagraphParams, config: &Config) -> Result<Value, ToolError> {
        let run_style = RunStyle {
            font_name: params.font_name.clone(),
            font_size: optional_number(params.font_size.as_ref(), "font_size")?,
            bold: only_if_set(bool_or(params.bold.as_ref(), "bold", false)?),
            italic: only_if_set(bool_or(params.italic.as_ref(), "italic", false)?),
            color: params.color.clone(),
        }
        .validated()?;

        let (source, destination) =
            resolve_for_write(&params.filename, params.output_filename.as_deref(), config)?;
        let mut document = open_document(&source)?;

        let style_id = match params.style.as_deref().filter(|s| !s.is_empty()) {
            Some(name) => Some(resolve_style(&document, name)?),
            None => None,
        };
        let paragraph_index =
            append_paragraph(&mut document, &params.text, style_id.as_deref(), &run_style);

        save_document(&document, &destination)?;

        info!("Added paragraph {} to {}", paragraph_index, destination.display());

        Ok(json!({
            "source_path": display_path(&source),
            "output_path": display_path(&destination),
            "paragraph_index": paragraph_index,
            "text": params.text,
            "style": params.style,
        }))
    }
}

/// Appends a heading paragraph.
pub struct AddHeadingTool;

impl DocxTool for AddHeadingTool {
    const NAME: &'static str = "add_heading";

    const DESCRIPTION: &'static str =
        "Append a heading paragraph with level 0-9 and optional font overrides.";

    type Params = AddHeadingParams;
    type Output = Value;

    #[instrument(skip_all, fields(filename = %params.filename))]
    fn run(params: AddHeadingParams, config: &Config) -> Result<Value, ToolError> {
        let level = int_or(params.level.as_ref(), "level", 1)?;
        let run_style = RunStyle {
            font_name: params.font_name.clone(),
            font_size: optional_number(params.font_size.as_ref(), "font_size")?,
            bold: only_if_set(bool_or(params.bold.as_ref(), "bold", false)?),
            italic: only_if_set(bool_or(params.italic.as_ref(), "italic", false)?),
            color: None,
        }
        .validated()?;
        if !(0..=9).contains(&level) {
            return Err(ToolError::new(
                ErrorCode::InvalidHeadingLevel,
                "Heading level must be between 0 and 9.",
            )
            .with_detail("level", level));
        }

        let (source, destination) =
            resolve_for_write(&params.filename, params.output_filename.as_deref(), config)?;
        let mut document = open_document(&source)?;

        let style_name = if level == 0 {
            "Title".to_string()
        } else {
            format!("Heading {level}")
        };
        let style_id = resolve_style(&document, &style_name)?;
        let paragraph_index =
            append_paragraph(&mut document, &params.text, Some(&style_id), &run_style);

        save_document(&document, &destination)?;

        info!("Added {} at paragraph {}", style_name, paragraph_index);

        Ok(json!({
            "source_path": display_path(&source),
            "output_path": display_path(&destination),
            "paragraph_index": paragraph_index,
            "text": params.text,
            "level": level,
        }))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::common::seed_document;
    use std::path::Path;
    use tempfile::TempDir;

    fn paragraph_params(path: &Path, text: &str) -> AddParagraphParams {
        AddParagraphParams {
            filename: path.to_string_lossy().to_string(),
            text: text.to_string(),
            style: None,
            font_name: None,
            font_size: None,
            bold: None,
            italic: None,
            color: None,
            output_filename: None,
        }
    }

    fn heading_params(path: &Path, level: LooseInt) -> AddHeadingParams {
        AddHeadingParams {
            filename: path.to_string_lossy().to_string(),
            text: "Chapter".to_string(),
            level: Some(level),
            font_name: None,
            font_size: None,
            bold: None,
            italic: None,
            output_filename: None,
        }
    }

    #[test]
    fn test_add_paragraph_with_formatting() {
        let temp_dir = TempDir::new().unwrap();
        let path = seed_document(temp_dir.path(), "doc.docx", |doc| {
            doc.add_paragraph().set_text("first");
        });

        let mut params = paragraph_params(&path, "Hello");
        params.style = Some("heading 2".to_string());
        params.font_name = Some("Arial".to_string());
        params.font_size = Some(LooseNumber::Text("12.5".to_string()));
        params.bold = Some(LooseBool::Text("yes".to_string()));
        params.italic = Some(LooseBool::Bool(false));
        params.color = Some("#00ff00".to_string());

        let result = AddParagraphTool::run(params, &Config::default()).unwrap();
        assert_eq!(result["paragraph_index"], json!(1));
        assert_eq!(result["style"], json!("heading 2"));

        let document = Document::open(&path).unwrap();
        let paragraph = document.paragraphs()[1];
        assert_eq!(paragraph.text(), "Hello");
        assert_eq!(paragraph.style_id(), Some("Heading2"));

        let rpr = paragraph.runs().next().unwrap().child("w:rPr").unwrap();
        assert_eq!(rpr.child("w:rFonts").unwrap().attr("w:ascii"), Some("Arial"));
        assert_eq!(rpr.child("w:sz").unwrap().attr("w:val"), Some("25"));
        assert!(rpr.child("w:b").is_some());
        assert!(rpr.child("w:i").is_none());
        assert_eq!(rpr.child("w:color").unwrap().attr("w:val"), Some("00FF00"));
    }

    #[test]
    fn test_add_paragraph_validates_before_opening() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.docx");

        let mut params = paragraph_params(&path, "x");
        params.bold = Some(LooseBool::Text("maybe".to_string()));
        let error = AddParagraphTool::run(params, &Config::default()).unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidBoolean);

        let mut params = paragraph_params(&path, "x");
        params.color = Some("red".to_string());
        let error = AddParagraphTool::run(params, &Config::default()).unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidColor);
    }

    #[test]
    fn test_unknown_style() {
        let temp_dir = TempDir::new().unwrap();
        let path = seed_document(temp_dir.path(), "doc.docx", |_| {});

        let mut params = paragraph_params(&path, "x");
        params.style = Some("No Such Style".to_string());
        let error = AddParagraphTool::run(params, &Config::default()).unwrap_err();
        assert_eq!(error.code, ErrorCode::StyleNotFound);
        assert_eq!(Document::open(&path).unwrap().paragraph_count(), 0);
    }

    #[test]
    fn test_add_heading_levels() {
        let temp_dir = TempDir::new().unwrap();
        let path = seed_document(temp_dir.path(), "doc.docx", |_| {});

        AddHeadingTool::run(heading_params(&path, LooseInt::Int(0)), &Config::default()).unwrap();
        let result =
            AddHeadingTool::run(heading_params(&path, LooseInt::Text("3".into())), &Config::default()).unwrap();
        assert_eq!(result["level"], json!(3));
        assert_eq!(result["paragraph_index"], json!(1));

        let document = Document::open(&path).unwrap();
        let styles: Vec<_> = document.paragraphs().iter().map(|p| p.style_id()).collect();
        assert_eq!(styles, vec![Some("Title"), Some("Heading3")]);
    }

    #[test]
    fn test_add_heading_rejects_level() {
        let temp_dir = TempDir::new().unwrap();
        let path = seed_document(temp_dir.path(), "doc.docx", |_| {});

        let error = AddHeadingTool::run(heading_params(&path, LooseInt::Int(10)), &Config::default()).unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidHeadingLevel);
        assert_eq!(error.details["level"], json!(10));

        let error = AddHeadingTool::run(heading_params(&path, LooseInt::Bool(true)), &Config::default()).unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidInteger);
    }
}
