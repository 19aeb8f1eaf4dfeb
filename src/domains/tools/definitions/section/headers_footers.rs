//! Set headers and footers tool definition.
//!
//! A section that shares its header with the previous section edits the
//! shared part unless `unlink_from_previous` gives it its own first.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, instrument};

use crate::core::config::Config;
use crate::core::security::resolve_for_write;
use crate::docx::fields::{PAGE_INSTRUCTION, field_run};
use crate::docx::{Alignment, DocxError, Document, ParagraphMut, StoryKind, XmlElement};
use crate::domains::tools::coerce::{
    LooseBool, LooseIndices, LooseInt, bool_or, optional_bool, optional_int,
};
use crate::domains::tools::definitions::common::{
    display_path, open_document, parse_alignment, save_document,
};
use crate::domains::tools::error::{ErrorCode, ToolError};
use crate::domains::tools::handlers::DocxTool;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the set headers and footers tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SetHeadersFootersParams {
    /// Path to the .docx file.
    pub filename: String,

    /// 0-based section indices; all sections when omitted, none when empty.
    #[serde(default)]
    pub section_indices: Option<LooseIndices>,

    #[serde(default)]
    pub header_text: Option<String>,

    #[serde(default)]
    pub footer_text: Option<String>,

    /// left, center, right or justify (default center).
    #[serde(default)]
    pub header_alignment: Option<String>,

    /// left, center, right or justify (default center).
    #[serde(default)]
    pub footer_alignment: Option<String>,

    /// Append a PAGE field to the footer (default false).
    #[serde(default)]
    pub include_page_number: Option<LooseBool>,

    /// Empty existing header/footer paragraphs before writing (default true).
    #[serde(default)]
    pub clear_existing: Option<LooseBool>,

    /// Restart page numbering at this value (>= 1).
    #[serde(default)]
    pub start_page_number: Option<LooseInt>,

    #[serde(default)]
    pub different_first_page: Option<LooseBool>,

    /// Document-wide odd/even header setting.
    #[serde(default)]
    pub different_odd_even: Option<LooseBool>,

    /// Give each selected section its own header and footer (default true).
    #[serde(default)]
    pub unlink_from_previous: Option<LooseBool>,

    /// Write the result here instead of editing in place.
    #[serde(default)]
    pub output_filename: Option<String>,
}

#[derive(Debug)]
struct StoryEdit<'a> {
    text: Option<&'a str>,
    alignment: Alignment,
    page_number: bool,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Sets header and footer content and numbering for selected sections.
pub struct SetHeadersFootersTool;

impl DocxTool for SetHeadersFootersTool {
    const NAME: &'static str = "set_headers_footers";

    const DESCRIPTION: &'static str =
        "Set section headers/footers, optional PAGE field, and section page number start.";

    type Params = SetHeadersFootersParams;
    type Output = Value;

    #[instrument(skip_all, fields(filename = %params.filename))]
    fn run(params: SetHeadersFootersParams, config: &Config) -> Result<Value, ToolError> {
        let section_indices = params
            .section_indices
            .as_ref()
            .map(|indices| indices.parse("section_indices"))
            .transpose()?;
        let include_page_number =
            bool_or(params.include_page_number.as_ref(), "include_page_number", false)?;
        let clear_existing = bool_or(params.clear_existing.as_ref(), "clear_existing", true)?;
        let start_page_number = optional_int(params.start_page_number.as_ref(), "start_page_number")?;
        let different_first_page =
            optional_bool(params.different_first_page.as_ref(), "different_first_page")?;
        let different_odd_even = optional_bool(params.different_odd_even.as_ref(), "different_odd_even")?;
        let unlink = bool_or(params.unlink_from_previous.as_ref(), "unlink_from_previous", true)?;

        let header_alignment = parse_alignment(
            params.header_alignment.as_deref().unwrap_or("center"),
            "header_alignment",
        )?;
        let footer_alignment = parse_alignment(
            params.footer_alignment.as_deref().unwrap_or("center"),
            "footer_alignment",
        )?;
        if let Some(start) = start_page_number.filter(|start| *start < 1) {
            return Err(ToolError::new(
                ErrorCode::InvalidPageNumber,
                "start_page_number must be >= 1.",
            )
            .with_detail("start_page_number", start));
        }

        let (source, destination) =
            resolve_for_write(&params.filename, params.output_filename.as_deref(), config)?;
        let mut document = open_document(&source)?;

        if let Some(on) = different_odd_even {
            document.set_even_and_odd_headers(on);
        }

        let section_count = document.section_count();
        let selected: Vec<usize> = match &section_indices {
            None => (0..section_count).collect(),
            Some(indices) => indices
                .iter()
                .map(|&index| {
                    usize::try_from(index)
                        .ok()
                        .filter(|index| *index < section_count)
                        .ok_or_else(|| {
                            ToolError::new(
                                ErrorCode::SectionIndexOutOfRange,
                                format!("Section index out of range: {index}"),
                            )
                            .with_detail("section_count", section_count)
                        })
                })
                .collect::<Result<_, _>>()?,
        };

        let header = params.header_text.as_deref().map(|text| StoryEdit {
            text: Some(text),
            alignment: header_alignment,
            page_number: false,
        });
        let footer = (params.footer_text.is_some() || include_page_number).then(|| StoryEdit {
            text: params.footer_text.as_deref(),
            alignment: footer_alignment,
            page_number: include_page_number,
        });

        for &index in &selected {
            if unlink {
                document
                    .unlink_from_previous(index, StoryKind::Header)
                    .map_err(|e| story_failure(&source, e))?;
                document
                    .unlink_from_previous(index, StoryKind::Footer)
                    .map_err(|e| story_failure(&source, e))?;
            }
            if let Some(mut section) = document.section_mut(index) {
                if let Some(on) = different_first_page {
                    section.set_different_first_page(on);
                }
                if let Some(start) = start_page_number {
                    section.restart_page_numbering(start);
                }
            }
            if let Some(edit) = &header {
                write_story(&mut document, index, StoryKind::Header, edit, clear_existing)
                    .map_err(|e| story_failure(&source, e))?;
            }
            if let Some(edit) = &footer {
                write_story(&mut document, index, StoryKind::Footer, edit, clear_existing)
                    .map_err(|e| story_failure(&source, e))?;
            }
            debug!("Updated section {}", index);
        }

        save_document(&document, &destination)?;

        info!("Updated headers/footers in {} sections", selected.len());

        Ok(json!({
            "source_path": display_path(&source),
            "output_path": display_path(&destination),
            "section_count": document.section_count(),
            "updated_sections": selected,
            "header_updated": header.is_some(),
            "footer_updated": footer.is_some(),
            "include_page_number": include_page_number,
            "start_page_number": start_page_number,
            "different_first_page": different_first_page,
            "different_odd_even": different_odd_even,
        }))
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn story_failure(path: &std::path::Path, error: DocxError) -> ToolError {
    ToolError::new(
        ErrorCode::DocxOpenFailed,
        format!("Failed to open DOCX: {}", path.display()),
    )
    .with_detail("error", error.to_string())
}

/// The paragraph to write into: the first one, emptied first when
/// `clear_existing`, or a new one when the part has none.
fn prepare_paragraph(story: &mut XmlElement, clear_existing: bool) -> ParagraphMut<'_> {
    if clear_existing {
        for paragraph in story.children_named_mut("w:p") {
            ParagraphMut::new(paragraph).clear();
        }
    }
    ParagraphMut::new(story.get_or_insert_first("w:p"))
}

fn write_story(
    document: &mut Document,
    section: usize,
    kind: StoryKind,
    edit: &StoryEdit<'_>,
    clear_existing: bool,
) -> Result<(), DocxError> {
    let story = document.story_mut(section, kind)?;
    let mut paragraph = prepare_paragraph(story, clear_existing);
    if let Some(text) = edit.text {
        paragraph.set_text(text);
    }
    paragraph.format().set_alignment(edit.alignment);
    if edit.page_number {
        if !paragraph.text().is_empty() {
            paragraph.add_run(" ");
        }
        paragraph.push(field_run(PAGE_INSTRUCTION));
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
