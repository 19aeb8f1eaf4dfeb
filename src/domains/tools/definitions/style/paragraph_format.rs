//! Set paragraph format tool definition.

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::core::config::Config;
use crate::core::security::resolve_for_write;
use crate::docx::{Alignment, ParagraphMut};
use crate::domains::tools::coerce::{LooseBool, LooseIndices, LooseNumber, optional_bool, optional_number};
use crate::domains::tools::definitions::common::{
    RunStyle, display_path, open_document, optional_alignment, save_document,
};
use crate::domains::tools::error::{ErrorCode, ToolError};
use crate::domains::tools::handlers::DocxTool;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the set paragraph format tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SetParagraphFormatParams {
    /// Path to the .docx file.
    pub filename: String,

    /// 0-based paragraph indices: a list, "1,3,5" or "[1,3,5]".
    #[serde(default)]
    pub paragraph_indices: Option<LooseIndices>,

    /// Also select every paragraph whose text contains this substring.
    #[serde(default)]
    pub contains_text: Option<String>,

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

    /// left, center, right or justify.
    #[serde(default)]
    pub alignment: Option<String>,

    /// Line spacing multiple, e.g. 1.5.
    #[serde(default)]
    pub line_spacing: Option<LooseNumber>,

    #[serde(default)]
    pub space_before_pt: Option<LooseNumber>,

    #[serde(default)]
    pub space_after_pt: Option<LooseNumber>,

    #[serde(default)]
    pub left_indent_pt: Option<LooseNumber>,

    #[serde(default)]
    pub right_indent_pt: Option<LooseNumber>,

    /// Negative values produce a hanging indent.
    #[serde(default)]
    pub first_line_indent_pt: Option<LooseNumber>,

    /// Write the result here instead of editing in place.
    #[serde(default)]
    pub output_filename: Option<String>,
}

/// Paragraph-level properties to apply. Unset fields are left untouched.
#[derive(Debug, Default)]
struct ParagraphLayout {
    alignment: Option<Alignment>,
    line_spacing: Option<f64>,
    space_before: Option<f64>,
    space_after: Option<f64>,
    left_indent: Option<f64>,
    right_indent: Option<f64>,
    first_line_indent: Option<f64>,
}

impl ParagraphLayout {
    fn from_params(params: &SetParagraphFormatParams) -> Result<Self, ToolError> {
        let layout = Self {
            alignment: optional_alignment(params.alignment.as_deref(), "alignment")?,
            line_spacing: optional_number(params.line_spacing.as_ref(), "line_spacing")?,
            space_before: optional_number(params.space_before_pt.as_ref(), "space_before_pt")?,
            space_after: optional_number(params.space_after_pt.as_ref(), "space_after_pt")?,
            left_indent: optional_number(params.left_indent_pt.as_ref(), "left_indent_pt")?,
            right_indent: optional_number(params.right_indent_pt.as_ref(), "right_indent_pt")?,
            first_line_indent: optional_number(
                params.first_line_indent_pt.as_ref(),
                "first_line_indent_pt",
            )?,
        };
        if let Some(spacing) = layout.line_spacing.filter(|spacing| *spacing <= 0.0) {
            return Err(ToolError::new(
                ErrorCode::InvalidLineSpacing,
                "line_spacing must be greater than 0.",
            )
            .with_detail("line_spacing", spacing));
        }
        Ok(layout)
    }

    fn is_empty(&self) -> bool {
        self.alignment.is_none()
            && self.line_spacing.is_none()
            && self.space_before.is_none()
            && self.space_after.is_none()
            && self.left_indent.is_none()
            && self.right_indent.is_none()
            && self.first_line_indent.is_none()
    }

    fn apply(&self, paragraph: &mut ParagraphMut<'_>) {
        if self.is_empty() {
            return;
        }
        let mut format = paragraph.format();
        if let Some(alignment) = self.alignment {
            format.set_alignment(alignment);
        }
        if let Some(spacing) = self.line_spacing {
            format.set_line_spacing(spacing);
        }
        if let Some(points) = self.space_before {
            format.set_space_before(points);
        }
        if let Some(points) = self.space_after {
            format.set_space_after(points);
        }
        if let Some(points) = self.left_indent {
            format.set_left_indent(points);
        }
        if let Some(points) = self.right_indent {
            format.set_right_indent(points);
        }
        if let Some(points) = self.first_line_indent {
            format.set_first_line_indent(points);
        }
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Formats paragraphs picked by index, by contained text, or both.
pub struct SetParagraphFormatTool;

impl DocxTool for SetParagraphFormatTool {
    const NAME: &'static str = "set_paragraph_format";

    const DESCRIPTION: &'static str = "Apply font and paragraph formatting to target paragraphs \
        selected by paragraph_indices or contains_text.";

    type Params = SetParagraphFormatParams;
    type Output = Value;

    #[instrument(skip_all, fields(filename = %params.filename))]
    fn run(params: SetParagraphFormatParams, config: &Config) -> Result<Value, ToolError> {
        let indices = match &params.paragraph_indices {
            Some(indices) => indices.parse("paragraph_indices")?,
            None => Vec::new(),
        };
        let contains_text = params.contains_text.as_deref().filter(|text| !text.is_empty());
        if indices.is_empty() && contains_text.is_none() {
            return Err(ToolError::new(
                ErrorCode::MissingSelector,
                "Provide paragraph_indices or contains_text.",
            ));
        }

        let run_style = RunStyle {
            font_name: params.font_name.clone(),
            font_size: optional_number(params.font_size.as_ref(), "font_size")?,
            bold: optional_bool(params.bold.as_ref(), "bold")?,
            italic: optional_bool(params.italic.as_ref(), "italic")?,
            color: params.color.clone(),
        }
        .validated()?;
        let layout = ParagraphLayout::from_params(&params)?;

        let (source, destination) =
            resolve_for_write(&params.filename, params.output_filename.as_deref(), config)?;
        let mut document = open_document(&source)?;

        let paragraph_count = document.paragraph_count();
        let mut selected = BTreeSet::new();
        for index in indices {
            match usize::try_from(index).ok().filter(|index| *index < paragraph_count) {
                Some(index) => {
                    selected.insert(index);
                }
                None => {
                    return Err(ToolError::new(
                        ErrorCode::ParagraphIndexOutOfRange,
                        format!("Paragraph index out of range: {index}"),
                    )
                    .with_detail("paragraph_index", index)
                    .with_detail("paragraph_count", paragraph_count));
                }
            }
        }

        let mut matched_indices = Vec::new();
        for (index, mut paragraph) in document.paragraphs_mut().enumerate() {
            let by_text = contains_text.is_some_and(|needle| paragraph.text().contains(needle));
            if !selected.contains(&index) && !by_text {
                continue;
            }
            layout.apply(&mut paragraph);
            if !run_style.is_empty() {
                for mut run in paragraph.runs_mut() {
                    run_style.apply(&mut run);
                }
            }
            matched_indices.push(index);
        }

        save_document(&document, &destination)?;

        info!("Formatted {} paragraphs", matched_indices.len());

        Ok(json!({
            "source_path": display_path(&source),
            "output_path": display_path(&destination),
            "matched_count": matched_indices.len(),
            "matched_indices": matched_indices,
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
    use crate::domains::tools::definitions::common::seed_document;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn seeded(dir: &TempDir) -> PathBuf {
        seed_document(dir.path(), "doc.docx", |doc| {
            doc.add_paragraph().set_text("alpha");
            doc.add_paragraph().set_text("beta target");
            doc.add_paragraph().set_text("gamma");
            doc.add_paragraph().set_text("delta target");
        })
    }

    fn params(path: &Path) -> SetParagraphFormatParams {
        SetParagraphFormatParams {
            filename: path.to_string_lossy().to_string(),
            paragraph_indices: None,
            contains_text: None,
            font_name: None,
            font_size: None,
            bold: None,
            italic: None,
            color: None,
            alignment: None,
            line_spacing: None,
            space_before_pt: None,
            space_after_pt: None,
            left_indent_pt: None,
            right_indent_pt: None,
            first_line_indent_pt: None,
            output_filename: None,
        }
    }

    #[test]
    fn test_missing_selector() {
        let temp_dir = TempDir::new().unwrap();
        let path = seeded(&temp_dir);

        let mut p = params(&path);
        p.contains_text = Some(String::new());
        let error = SetParagraphFormatTool::run(p, &Config::default()).unwrap_err();
        assert_eq!(error.code, ErrorCode::MissingSelector);
    }

    #[test]
    fn test_indices_and_text_are_combined() {
        let temp_dir = TempDir::new().unwrap();
        let path = seeded(&temp_dir);

        let mut p = params(&path);
        p.paragraph_indices = Some(LooseIndices::Text("0, 1".to_string()));
        p.contains_text = Some("target".to_string());
        p.alignment = Some("Center".to_string());
        p.italic = Some(LooseBool::Bool(true));
        p.first_line_indent_pt = Some(LooseNumber::Number(-18.0));

        let result = SetParagraphFormatTool::run(p, &Config::default()).unwrap();
        assert_eq!(result["matched_indices"], json!([0, 1, 3]));
        assert_eq!(result["matched_count"], json!(3));

        let document = Document::open(&path).unwrap();
        let paragraphs = document.paragraphs();
        let ppr = paragraphs[3].element().child("w:pPr").unwrap();
        assert_eq!(ppr.child("w:jc").unwrap().attr("w:val"), Some("center"));
        assert_eq!(ppr.child("w:ind").unwrap().attr("w:hanging"), Some("360"));
        let rpr = paragraphs[3].runs().next().unwrap().child("w:rPr").unwrap();
        assert!(rpr.child("w:i").is_some());

        assert!(paragraphs[2].element().child("w:pPr").is_none());
    }

    #[test]
    fn test_explicit_false_clears_bold() {
        let temp_dir = TempDir::new().unwrap();
        let path = seed_document(temp_dir.path(), "doc.docx", |doc| {
            doc.add_paragraph().add_run("loud").format().set_bold(true);
        });

        let mut p = params(&path);
        p.paragraph_indices = Some(LooseIndices::List(vec![json!(0)]));
        p.bold = Some(LooseBool::Text("false".to_string()));
        SetParagraphFormatTool::run(p, &Config::default()).unwrap();

        let document = Document::open(&path).unwrap();
        let run = document.paragraphs()[0].runs().next().unwrap();
        let bold = run.child("w:rPr").and_then(|rpr| rpr.child("w:b"));
        assert!(bold.is_none_or(|b| b.attr("w:val") == Some("0")));
    }

    #[test]
    fn test_index_out_of_range() {
        let temp_dir = TempDir::new().unwrap();
        let path = seeded(&temp_dir);

        let mut p = params(&path);
        p.paragraph_indices = Some(LooseIndices::List(vec![json!(1), json!(9)]));
        let error = SetParagraphFormatTool::run(p, &Config::default()).unwrap_err();
        assert_eq!(error.code, ErrorCode::ParagraphIndexOutOfRange);
        assert_eq!(error.message, "Paragraph index out of range: 9");
        assert_eq!(error.details["paragraph_count"], json!(4));
    }

    #[test]
    fn test_invalid_line_spacing() {
        let temp_dir = TempDir::new().unwrap();
        let path = seeded(&temp_dir);

        let mut p = params(&path);
        p.contains_text = Some("alpha".to_string());
        p.line_spacing = Some(LooseNumber::Number(0.0));
        let error = SetParagraphFormatTool::run(p, &Config::default()).unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidLineSpacing);
    }
}
