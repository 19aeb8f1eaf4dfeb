//! Insert table of contents tool definition.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::core::config::Config;
use crate::core::security::resolve_for_write;
use crate::docx::fields::{field_run, toc_instruction};
use crate::domains::tools::coerce::{LooseBool, LooseInt, bool_or, int_or};
use crate::domains::tools::definitions::common::{display_path, open_document, save_document};
use crate::domains::tools::error::{ErrorCode, ToolError};
use crate::domains::tools::handlers::DocxTool;

const DEFAULT_TITLE: &str = "Table of Contents";

/// Parameters for the insert table of contents tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct InsertTableOfContentsParams {
    /// Path to the .docx file.
    pub filename: String,

    /// Shallowest heading level listed (default 1).
    #[serde(default)]
    pub heading_start: Option<LooseInt>,

    /// Deepest heading level listed (default 3).
    #[serde(default)]
    pub heading_end: Option<LooseInt>,

    /// Title paragraph written before the field; empty for none.
    #[serde(default)]
    pub title_text: Option<String>,

    /// Start the table of contents on a new page (default false).
    #[serde(default)]
    pub add_page_break_before: Option<LooseBool>,

    /// Write the result here instead of editing in place.
    #[serde(default)]
    pub output_filename: Option<String>,
}

/// Appends a TOC field, which Word fills in when fields are updated.
pub struct InsertTableOfContentsTool;

impl DocxTool for InsertTableOfContentsTool {
    const NAME: &'static str = "insert_table_of_contents";

    const DESCRIPTION: &'static str =
        "Insert a TOC field code (Word updates the content when fields are refreshed).";

    type Params = InsertTableOfContentsParams;
    type Output = Value;

    #[instrument(skip_all, fields(filename = %params.filename))]
    fn run(params: InsertTableOfContentsParams, config: &Config) -> Result<Value, ToolError> {
        let heading_start = int_or(params.heading_start.as_ref(), "heading_start", 1)?;
        let heading_end = int_or(params.heading_end.as_ref(), "heading_end", 3)?;
        let page_break = bool_or(
            params.add_page_break_before.as_ref(),
            "add_page_break_before",
            false,
        )?;
        if !(1..=9).contains(&heading_start)
            || !(1..=9).contains(&heading_end)
            || heading_start > heading_end
        {
            return Err(ToolError::new(
                ErrorCode::InvalidHeadingRange,
                "Heading range must satisfy 1 <= start <= end <= 9.",
            )
            .with_detail("heading_start", heading_start)
            .with_detail("heading_end", heading_end));
        }
        let title = params.title_text.as_deref().unwrap_or(DEFAULT_TITLE);

        let (source, destination) =
            resolve_for_write(&params.filename, params.output_filename.as_deref(), config)?;
        let mut document = open_document(&source)?;

        if page_break {
            document.add_page_break();
        }
        if !title.is_empty() {
            document.add_paragraph().set_text(title);
        }
        document
            .add_paragraph()
            .push(field_run(&toc_instruction(heading_start, heading_end)));
        let toc_paragraph_index = document.paragraph_count() - 1;

        save_document(&document, &destination)?;

        info!("Inserted TOC for headings {}-{}", heading_start, heading_end);

        Ok(json!({
            "source_path": display_path(&source),
            "output_path": display_path(&destination),
            "heading_start": heading_start,
            "heading_end": heading_end,
            "title_text": (!title.is_empty()).then_some(title),
            "toc_paragraph_index": toc_paragraph_index,
        }))
    }
}
