//! Add sequence caption tool definition.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, instrument};

use crate::core::config::Config;
use crate::core::security::resolve_for_write;
use crate::docx::fields::{field_run, seq_instruction};
use crate::domains::tools::definitions::common::{display_path, open_document, save_document};
use crate::domains::tools::error::{ErrorCode, ToolError};
use crate::domains::tools::handlers::DocxTool;

/// Parameters for the add sequence caption tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddSequenceCaptionParams {
    /// Path to the .docx file.
    pub filename: String,

    /// Visible label such as "Figure" or "Table".
    pub label: String,

    /// Caption text after the number.
    pub caption_text: String,

    /// SEQ identifier; defaults to the label.
    #[serde(default)]
    pub seq_identifier: Option<String>,

    /// Text between the number and the caption (default ": ").
    #[serde(default)]
    pub separator: Option<String>,

    /// Write the result here instead of editing in place.
    #[serde(default)]
    pub output_filename: Option<String>,
}

/// Appends a numbered caption paragraph such as "Figure 1: Overview".
pub struct AddSequenceCaptionTool;

impl DocxTool for AddSequenceCaptionTool {
    const NAME: &'static str = "add_sequence_caption";

    const DESCRIPTION: &'static str =
        "Append a caption paragraph with a SEQ field, e.g. 'Figure {SEQ Figure}: text'.";

    type Params = AddSequenceCaptionParams;
    type Output = Value;

    #[instrument(skip_all, fields(filename = %params.filename))]
    fn run(params: AddSequenceCaptionParams, config: &Config) -> Result<Value, ToolError> {
        let label = params.label.trim();
        if label.is_empty() {
            return Err(ToolError::new(ErrorCode::InvalidLabel, "label cannot be empty."));
        }
        let caption = params.caption_text.trim();
        if caption.is_empty() {
            return Err(ToolError::new(
                ErrorCode::InvalidCaptionText,
                "caption_text cannot be empty.",
            ));
        }
        let sequence = match params.seq_identifier.as_deref() {
            Some(identifier) if !identifier.is_empty() => identifier.trim(),
            _ => label,
        };
        if sequence.is_empty() {
            return Err(ToolError::new(
                ErrorCode::InvalidSequence,
                "seq_identifier cannot be empty when provided.",
            ));
        }
        let separator = params.separator.as_deref().unwrap_or(": ");

        let (source, destination) =
            resolve_for_write(&params.filename, params.output_filename.as_deref(), config)?;
        let mut document = open_document(&source)?;

        let caption_style = document.styles().style_id_for("Caption");
        let mut paragraph = document.add_paragraph();
        match &caption_style {
            Some(style_id) => paragraph.set_style(style_id),
            None => debug!("Caption style missing, leaving paragraph unstyled"),
        }
        paragraph.add_run(&format!("{label} "));
        paragraph.push(field_run(&seq_instruction(sequence)));
        paragraph.add_run(&format!("{separator}{caption}"));
        let paragraph_index = document.paragraph_count() - 1;

        save_document(&document, &destination)?;

        info!("Added {} caption at paragraph {}", label, paragraph_index);

        Ok(json!({
            "source_path": display_path(&source),
            "output_path": display_path(&destination),
            "label": label,
            "seq_identifier": sequence,
            "paragraph_index": paragraph_index,
        }))
    }
}
