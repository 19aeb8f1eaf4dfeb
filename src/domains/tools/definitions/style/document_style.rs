//! Apply document style tool definition.
//!
//! Normalizes page setup and the Normal and Heading styles, then optionally
//! rewrites direct formatting on existing paragraphs so body text and headings
//! look consistent.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, instrument};

use crate::core::config::Config;
use crate::core::security::resolve_for_write;
use crate::docx::units::{twips_from_cm, twips_from_mm};
use crate::docx::{Alignment, Document, Margins};
use crate::domains::tools::coerce::{LooseBool, LooseInt, LooseNumber, bool_or, int_or, number_or};
use crate::domains::tools::definitions::common::{
    display_path, open_document, parse_alignment, resolve_style, save_document,
};
use crate::domains::tools::error::{ErrorCode, ToolError};
use crate::domains::tools::handlers::DocxTool;

/// Supported page sizes as (name, width mm, height mm).
const PAGE_SIZES: &[(&str, f64, f64)] = &[("A4", 210.0, 297.0), ("LETTER", 215.9, 279.4)];

const DEFAULT_MARGIN_CM: f64 = 2.54;
const DEFAULT_FONT: &str = "Calibri";

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the apply document style tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ApplyDocumentStyleParams {
    /// Path to the .docx file.
    pub filename: String,

    /// A4 or LETTER (default A4).
    #[serde(default)]
    pub page_size: Option<String>,

    #[serde(default)]
    pub margin_top_cm: Option<LooseNumber>,

    #[serde(default)]
    pub margin_bottom_cm: Option<LooseNumber>,

    #[serde(default)]
    pub margin_left_cm: Option<LooseNumber>,

    #[serde(default)]
    pub margin_right_cm: Option<LooseNumber>,

    /// East Asian font for body text.
    #[serde(default)]
    pub normal_font_name: Option<String>,

    /// Western font for body text.
    #[serde(default)]
    pub normal_western_font_name: Option<String>,

    #[serde(default)]
    pub normal_font_size_pt: Option<LooseNumber>,

    #[serde(default)]
    pub normal_line_spacing: Option<LooseNumber>,

    #[serde(default)]
    pub normal_first_line_indent_pt: Option<LooseNumber>,

    /// left, center, right or justify.
    #[serde(default)]
    pub normal_alignment: Option<String>,

    /// East Asian font for headings.
    #[serde(default)]
    pub heading_font_name: Option<String>,

    /// Western font for headings.
    #[serde(default)]
    pub heading_western_font_name: Option<String>,

    #[serde(default)]
    pub heading_1_size_pt: Option<LooseNumber>,

    #[serde(default)]
    pub heading_2_size_pt: Option<LooseNumber>,

    /// Also used for levels 4 and deeper.
    #[serde(default)]
    pub heading_3_size_pt: Option<LooseNumber>,

    /// Deepest heading level to style, 1-9 (default 3).
    #[serde(default)]
    pub max_heading_level: Option<LooseInt>,

    /// Rewrite direct formatting on existing paragraphs (default true).
    #[serde(default)]
    pub apply_to_existing_paragraphs: Option<LooseBool>,

    /// Write the result here instead of editing in place.
    #[serde(default)]
    pub output_filename: Option<String>,
}

// ============================================================================
// Resolved Settings
// ============================================================================

#[derive(Debug)]
struct MarginsCm {
    top: f64,
    bottom: f64,
    left: f64,
    right: f64,
}

#[derive(Debug)]
struct StyleSettings {
    page_name: &'static str,
    page_mm: (f64, f64),
    margins: MarginsCm,
    normal_east_asian: String,
    normal_western: String,
    normal_size: f64,
    line_spacing: f64,
    first_line_indent: f64,
    alignment: Alignment,
    heading_east_asian: String,
    heading_western: String,
    heading_sizes: [f64; 3],
    max_heading_level: i64,
    apply_to_existing: bool,
}

fn font_or(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_FONT)
        .to_string()
}

fn positive(value: f64, field: &str) -> Result<f64, ToolError> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ToolError::new(ErrorCode::InvalidNumber, format!("{field} must be greater than 0."))
            .with_detail("field", field)
            .with_detail("value", value))
    }
}

fn positive_or(value: Option<&LooseNumber>, field: &str, default: f64) -> Result<f64, ToolError> {
    positive(number_or(value, field, default)?, field)
}

impl StyleSettings {
    fn from_params(params: &ApplyDocumentStyleParams) -> Result<Self, ToolError> {
        let requested = params.page_size.as_deref().unwrap_or("A4").trim().to_uppercase();
        let &(page_name, width, height) = PAGE_SIZES
            .iter()
            .find(|(name, _, _)| *name == requested)
            .ok_or_else(|| {
                let supported: Vec<&str> = PAGE_SIZES.iter().map(|(name, _, _)| *name).collect();
                ToolError::new(
                    ErrorCode::InvalidPageSize,
                    format!("Unsupported page_size: {requested}"),
                )
                .with_detail("supported", supported)
            })?;

        let max_heading_level = int_or(params.max_heading_level.as_ref(), "max_heading_level", 3)?;
        if !(1..=9).contains(&max_heading_level) {
            return Err(ToolError::new(
                ErrorCode::InvalidHeadingLevel,
                "max_heading_level must be between 1 and 9.",
            )
            .with_detail("max_heading_level", max_heading_level));
        }
        let apply_to_existing = bool_or(
            params.apply_to_existing_paragraphs.as_ref(),
            "apply_to_existing_paragraphs",
            true,
        )?;

        let normal_size = positive_or(params.normal_font_size_pt.as_ref(), "normal_font_size_pt", 11.0)?;
        let line_spacing = positive_or(params.normal_line_spacing.as_ref(), "normal_line_spacing", 1.15)?;
        let heading_sizes = [
            positive_or(params.heading_1_size_pt.as_ref(), "heading_1_size_pt", 16.0)?,
            positive_or(params.heading_2_size_pt.as_ref(), "heading_2_size_pt", 14.0)?,
            positive_or(params.heading_3_size_pt.as_ref(), "heading_3_size_pt", 12.0)?,
        ];
        let margins = MarginsCm {
            top: positive_or(params.margin_top_cm.as_ref(), "margin_top_cm", DEFAULT_MARGIN_CM)?,
            bottom: positive_or(params.margin_bottom_cm.as_ref(), "margin_bottom_cm", DEFAULT_MARGIN_CM)?,
            left: positive_or(params.margin_left_cm.as_ref(), "margin_left_cm", DEFAULT_MARGIN_CM)?,
            right: positive_or(params.margin_right_cm.as_ref(), "margin_right_cm", DEFAULT_MARGIN_CM)?,
        };

        let first_line_indent = number_or(
            params.normal_first_line_indent_pt.as_ref(),
            "normal_first_line_indent_pt",
            0.0,
        )?;
        if first_line_indent < 0.0 {
            return Err(ToolError::new(
                ErrorCode::InvalidNumber,
                "normal_first_line_indent_pt must be 0 or greater.",
            )
            .with_detail("field", "normal_first_line_indent_pt")
            .with_detail("value", first_line_indent));
        }

        let alignment = match params.normal_alignment.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => parse_alignment(value, "normal_alignment")?,
            _ => Alignment::Left,
        };

        Ok(Self {
            page_name,
            page_mm: (width, height),
            margins,
            normal_east_asian: font_or(params.normal_font_name.as_deref()),
            normal_western: font_or(params.normal_western_font_name.as_deref()),
            normal_size,
            line_spacing,
            first_line_indent,
            alignment,
            heading_east_asian: font_or(params.heading_font_name.as_deref()),
            heading_western: font_or(params.heading_western_font_name.as_deref()),
            heading_sizes,
            max_heading_level,
            apply_to_existing,
        })
    }

    /// Size for a heading level; levels past 3 share the level 3 size.
    fn heading_size(&self, level: i64) -> f64 {
        let slot = usize::try_from(level.clamp(1, 3) - 1).unwrap_or(0);
        self.heading_sizes[slot]
    }
}

/// Heading level from a style display name such as "Heading 2" or "标题 2".
fn heading_level(style_name: &str) -> Option<i64> {
    let lowered = style_name.to_lowercase();
    ["heading", "标题"].iter().find_map(|prefix| {
        let start = lowered.find(prefix)? + prefix.len();
        let digits: String = lowered[start..]
            .trim_start()
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        digits.parse().ok()
    })
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Applies page setup and a consistent body/heading typography.
pub struct ApplyDocumentStyleTool;

impl DocxTool for ApplyDocumentStyleTool {
    const NAME: &'static str = "apply_document_style";

    const DESCRIPTION: &'static str = "Apply page setup and consistent Normal and Heading styles \
        to a document, optionally rewriting formatting on existing paragraphs.";

    type Params = ApplyDocumentStyleParams;
    type Output = Value;

    #[instrument(skip_all, fields(filename = %params.filename))]
    fn run(params: ApplyDocumentStyleParams, config: &Config) -> Result<Value, ToolError> {
        let settings = StyleSettings::from_params(&params)?;

        let (source, destination) =
            resolve_for_write(&params.filename, params.output_filename.as_deref(), config)?;
        let mut document = open_document(&source)?;

        apply_page_setup(&mut document, &settings);
        apply_styles(&mut document, &settings)?;

        let (heading_count, body_count) = if settings.apply_to_existing {
            restyle_paragraphs(&mut document, &settings)
        } else {
            (0, 0)
        };

        save_document(&document, &destination)?;

        info!(
            "Applied {} page style: {} headings, {} body paragraphs",
            settings.page_name, heading_count, body_count
        );

        Ok(json!({
            "source_path": display_path(&source),
            "output_path": display_path(&destination),
            "page_size": settings.page_name,
            "section_count": document.section_count(),
            "paragraph_count": document.paragraph_count(),
            "heading_paragraph_count": heading_count,
            "body_paragraph_count": body_count,
            "apply_to_existing_paragraphs": settings.apply_to_existing,
            "margins_cm": {
                "top": settings.margins.top,
                "bottom": settings.margins.bottom,
                "left": settings.margins.left,
                "right": settings.margins.right,
            },
        }))
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn apply_page_setup(document: &mut Document, settings: &StyleSettings) {
    let (width, height) = settings.page_mm;
    let margins = &settings.margins;
    for index in 0..document.section_count() {
        if let Some(mut section) = document.section_mut(index) {
            section.set_page_size(twips_from_mm(width), twips_from_mm(height));
            section.set_margins(Margins {
                top: twips_from_cm(margins.top),
                bottom: twips_from_cm(margins.bottom),
                left: twips_from_cm(margins.left),
                right: twips_from_cm(margins.right),
            });
        }
    }
}

fn apply_styles(document: &mut Document, settings: &StyleSettings) -> Result<(), ToolError> {
    let normal_id = resolve_style(document, "Normal")?;
    let heading_ids: Vec<(i64, String)> = (1..=settings.max_heading_level)
        .filter_map(|level| {
            let id = document.styles().style_id_for(&format!("Heading {level}"));
            if id.is_none() {
                debug!("Heading {} style missing, skipping", level);
            }
            id.map(|id| (level, id))
        })
        .collect();

    let styles = document.styles_mut();
    if let Some(mut normal) = styles.style_mut(&normal_id) {
        let mut run = normal.run_format();
        run.set_fonts(&settings.normal_western, &settings.normal_east_asian);
        run.set_size(settings.normal_size);
        let mut paragraph = normal.paragraph_format();
        paragraph.set_line_spacing(settings.line_spacing);
        paragraph.set_first_line_indent(settings.first_line_indent);
        paragraph.set_space_before(0.0);
        paragraph.set_space_after(0.0);
    }

    for (level, id) in heading_ids {
        if let Some(mut heading) = styles.style_mut(&id) {
            let mut run = heading.run_format();
            run.set_fonts(&settings.heading_western, &settings.heading_east_asian);
            run.set_size(settings.heading_size(level));
            run.set_bold(true);
        }
    }
    Ok(())
}

/// Rewrite direct formatting on every top-level paragraph. Returns
/// (heading count, body count).
fn restyle_paragraphs(document: &mut Document, settings: &StyleSettings) -> (usize, usize) {
    let levels: Vec<Option<i64>> = {
        let styles = document.styles();
        document
            .paragraphs()
            .iter()
            .map(|paragraph| heading_level(&styles.paragraph_style_name(paragraph.style_id())))
            .collect()
    };

    let (mut headings, mut bodies) = (0, 0);
    for (mut paragraph, level) in document.paragraphs_mut().zip(levels) {
        match level.filter(|level| *level <= settings.max_heading_level) {
            Some(level) => {
                headings += 1;
                paragraph.format().set_first_line_indent(0.0);
                for mut run in paragraph.runs_mut() {
                    let mut format = run.format();
                    format.set_fonts(&settings.heading_western, &settings.heading_east_asian);
                    format.set_size(settings.heading_size(level));
                    format.set_bold(true);
                }
            }
            None => {
                bodies += 1;
                let mut format = paragraph.format();
                format.set_alignment(settings.alignment);
                format.set_line_spacing(settings.line_spacing);
                format.set_first_line_indent(settings.first_line_indent);
                format.set_space_before(0.0);
                format.set_space_after(0.0);
                for mut run in paragraph.runs_mut() {
                    let mut format = run.format();
                    format.set_fonts(&settings.normal_western, &settings.normal_east_asian);
                    format.set_size(settings.normal_size);
                }
            }
        }
    }
    (headings, bodies)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::common::seed_document;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn params(path: &Path) -> ApplyDocumentStyleParams {
        ApplyDocumentStyleParams {
            filename: path.to_string_lossy().to_string(),
            page_size: None,
            margin_top_cm: None,
            margin_bottom_cm: None,
            margin_left_cm: None,
            margin_right_cm: None,
            normal_font_name: None,
            normal_western_font_name: None,
            normal_font_size_pt: None,
            normal_line_spacing: None,
            normal_first_line_indent_pt: None,
            normal_alignment: None,
            heading_font_name: None,
            heading_western_font_name: None,
            heading_1_size_pt: None,
            heading_2_size_pt: None,
            heading_3_size_pt: None,
            max_heading_level: None,
            apply_to_existing_paragraphs: None,
            output_filename: None,
        }
    }

    fn seeded(dir: &TempDir) -> PathBuf {
        seed_document(dir.path(), "doc.docx", |doc| {
            let mut heading = doc.add_paragraph();
            heading.set_text("Intro");
            heading.set_style("Heading1");
            doc.add_paragraph().set_text("Body text");
            let mut deep = doc.add_paragraph();
            deep.set_text("Deep");
            deep.set_style("Heading5");
        })
    }

    #[test]
    fn test_heading_level_from_name() {
        assert_eq!(heading_level("Heading 2"), Some(2));
        assert_eq!(heading_level("heading3"), Some(3));
        assert_eq!(heading_level("标题 1"), Some(1));
        assert_eq!(heading_level("Normal"), None);
        assert_eq!(heading_level("Heading"), None);
    }

    #[test]
    fn test_letter_page_and_paragraph_counts() {
        let temp_dir = TempDir::new().unwrap();
        let path = seeded(&temp_dir);

        let mut p = params(&path);
        p.page_size = Some("letter".to_string());
        p.normal_alignment = Some("justify".to_string());
        p.margin_left_cm = Some(LooseNumber::Text("3".to_string()));
        p.normal_font_name = Some("SimSun".to_string());

        let result = ApplyDocumentStyleTool::run(p, &Config::default()).unwrap();
        assert_eq!(result["page_size"], json!("LETTER"));
        assert_eq!(result["heading_paragraph_count"], json!(1));
        assert_eq!(result["body_paragraph_count"], json!(2));
        assert_eq!(result["margins_cm"]["left"], json!(3.0));
        assert_eq!(result["margins_cm"]["top"], json!(2.54));

        let document = Document::open(&path).unwrap();
        let paragraphs = document.paragraphs();

        let body_ppr = paragraphs[1].element().child("w:pPr").unwrap();
        assert_eq!(body_ppr.child("w:jc").unwrap().attr("w:val"), Some("both"));
        let body_fonts = paragraphs[1].runs().next().unwrap().child("w:rPr").unwrap().child("w:rFonts").unwrap();
        assert_eq!(body_fonts.attr("w:eastAsia"), Some("SimSun"));
        assert_eq!(body_fonts.attr("w:ascii"), Some("Calibri"));

        let heading_rpr = paragraphs[0].runs().next().unwrap().child("w:rPr").unwrap();
        assert_eq!(heading_rpr.child("w:sz").unwrap().attr("w:val"), Some("32"));
        assert!(heading_rpr.child("w:b").is_some());
    }

    #[test]
    fn test_leave_existing_paragraphs() {
        let temp_dir = TempDir::new().unwrap();
        let path = seeded(&temp_dir);

        let mut p = params(&path);
        p.apply_to_existing_paragraphs = Some(LooseBool::Text("no".to_string()));
        let result = ApplyDocumentStyleTool::run(p, &Config::default()).unwrap();
        assert_eq!(result["heading_paragraph_count"], json!(0));
        assert_eq!(result["body_paragraph_count"], json!(0));
        assert_eq!(result["paragraph_count"], json!(3));

        let document = Document::open(&path).unwrap();
        assert!(document.paragraphs()[1].element().child("w:pPr").is_none());
    }

    #[test]
    fn test_validation_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.docx");

        let mut p = params(&path);
        p.page_size = Some("B5".to_string());
        p.max_heading_level = Some(LooseInt::Int(12));
        let error = ApplyDocumentStyleTool::run(p, &Config::default()).unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidPageSize);
        assert_eq!(error.details["supported"], json!(["A4", "LETTER"]));

        let mut p = params(&path);
        p.max_heading_level = Some(LooseInt::Int(0));
        let error = ApplyDocumentStyleTool::run(p, &Config::default()).unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidHeadingLevel);

        let mut p = params(&path);
        p.heading_2_size_pt = Some(LooseNumber::Number(0.0));
        let error = ApplyDocumentStyleTool::run(p, &Config::default()).unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidNumber);
        assert_eq!(error.details["field"], json!("heading_2_size_pt"));

        let mut p = params(&path);
        p.normal_first_line_indent_pt = Some(LooseNumber::Number(-2.0));
        assert_eq!(ApplyDocumentStyleTool::run(p, &Config::default()).unwrap_err().code, ErrorCode::InvalidNumber);

        let mut p = params(&path);
        p.normal_alignment = Some("middle".to_string());
        assert_eq!(ApplyDocumentStyleTool::run(p, &Config::default()).unwrap_err().code, ErrorCode::InvalidAlignment);

        let p = params(&path);
        assert_eq!(ApplyDocumentStyleTool::run(p, &Config::default()).unwrap_err().code, ErrorCode::FileNotFound);
    }
}
