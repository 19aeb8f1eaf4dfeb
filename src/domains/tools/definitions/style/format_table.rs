//! Format table tool definition.
//!
//! Sets the six table borders, shades and bolds the header row, applies a
//! two-color banding to the remaining rows and toggles auto-fit.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::core::config::Config;
use crate::core::security::resolve_for_write;
use crate::docx::table::{BORDER_STYLES, border_value, cell_paragraphs_mut, shade_cell};
use crate::domains::tools::coerce::{
    LooseBool, LooseInt, LooseStringList, bool_or, normalize_color, optional_auto_fit,
    optional_color,
};
use crate::domains::tools::definitions::common::{
    color_or, display_path, open_document, save_document,
};
use crate::domains::tools::error::{ErrorCode, ToolError};
use crate::domains::tools::handlers::DocxTool;

const DEFAULT_HEADER_FILL: &str = "D9E2F3";

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the format table tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FormatTableParams {
    /// Path to the .docx file.
    pub filename: String,

    /// 0-based index among top-level tables.
    pub table_index: LooseInt,

    /// One of: single, dashed, dotted, double, none (default single).
    #[serde(default)]
    pub border_style: Option<String>,

    /// Treat the first row as a header (default true).
    #[serde(default)]
    pub has_header_row: Option<LooseBool>,

    /// Two alternating fill colors for body rows, e.g. ["FFFFFF", "F2F2F2"].
    #[serde(default)]
    pub shading: Option<LooseStringList>,

    /// Header row fill color (default D9E2F3).
    #[serde(default)]
    pub header_fill_color: Option<String>,

    /// Header row text color.
    #[serde(default)]
    pub header_text_color: Option<String>,

    /// true/"content"/"window" to auto-fit, false/"fixed" for a fixed layout.
    #[serde(default)]
    pub auto_fit: Option<LooseBool>,

    /// Write the result here instead of editing in place.
    #[serde(default)]
    pub output_filename: Option<String>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Applies borders, header styling and banded shading to one table.
pub struct FormatTableTool;

impl DocxTool for FormatTableTool {
    const NAME: &'static str = "format_table";

    const DESCRIPTION: &'static str =
        "Format a table with borders, header row styling, alternating row shading and auto-fit.";

    type Params = FormatTableParams;
    type Output = Value;

    #[instrument(skip_all, fields(filename = %params.filename))]
    fn run(params: FormatTableParams, config: &Config) -> Result<Value, ToolError> {
        let table_index = params.table_index.parse("table_index")?;
        let has_header_row = bool_or(params.has_header_row.as_ref(), "has_header_row", true)?;
        let shading = match &params.shading {
            Some(shading) => shading.parse("shading")?,
            None => None,
        };
        let auto_fit = optional_auto_fit(params.auto_fit.as_ref(), "auto_fit")?;

        let border_style = params
            .border_style
            .clone()
            .unwrap_or_else(|| "single".to_string());
        let border = border_value(&border_style).ok_or_else(|| {
            let mut supported: Vec<&str> = BORDER_STYLES.iter().map(|(name, _)| *name).collect();
            supported.sort_unstable();
            ToolError::new(
                ErrorCode::InvalidBorderStyle,
                format!("Unsupported border_style: {border_style}"),
            )
            .with_detail("supported", supported)
        })?;
        let header_fill = color_or(
            params.header_fill_color.as_deref(),
            "header_fill_color",
            DEFAULT_HEADER_FILL,
        )?;
        let header_text = optional_color(params.header_text_color.as_deref(), "header_text_color")?;
        let banding = match shading.filter(|colors| !colors.is_empty()) {
            Some(colors) if colors.len() < 2 => {
                return Err(ToolError::new(
                    ErrorCode::InvalidShading,
                    "shading must include at least 2 colors.",
                )
                .with_detail("shading", colors));
            }
            Some(colors) => Some([
                normalize_color(&colors[0], "shading")?,
                normalize_color(&colors[1], "shading")?,
            ]),
            None => None,
        };

        let (source, destination) =
            resolve_for_write(&params.filename, params.output_filename.as_deref(), config)?;
        let mut document = open_document(&source)?;

        let table_count = document.table_count();
        let mut table = usize::try_from(table_index)
            .ok()
            .and_then(|index| document.table_mut(index))
            .ok_or_else(|| {
                ToolError::new(
                    ErrorCode::TableIndexOutOfRange,
                    format!("table_index {table_index} is out of range"),
                )
                .with_detail("table_count", table_count)
            })?;

        table.set_borders(border);
        if let Some(auto_fit) = auto_fit {
            table.set_autofit(auto_fit);
        }

        let mut shaded_rows = 0;
        let band_start = usize::from(has_header_row);
        for (row_index, cells) in table.rows_mut().enumerate() {
            if has_header_row && row_index == 0 {
                for cell in cells {
                    shade_cell(cell, &header_fill);
                    for mut paragraph in cell_paragraphs_mut(cell) {
                        for mut run in paragraph.runs_mut() {
                            let mut format = run.format();
                            format.set_bold(true);
                            if let Some(color) = &header_text {
                                format.set_color(color);
                            }
                        }
                    }
                }
                shaded_rows += 1;
                continue;
            }
            if let Some(colors) = &banding {
                let fill = &colors[(row_index - band_start) % 2];
                for cell in cells {
                    shade_cell(cell, fill);
                }
                shaded_rows += 1;
            }
        }

        let view = table.view();
        let (rows, cols) = (view.row_count(), view.column_count());

        save_document(&document, &destination)?;

        info!("Formatted table {} ({} shaded rows)", table_index, shaded_rows);

        Ok(json!({
            "source_path": display_path(&source),
            "output_path": display_path(&destination),
            "table_index": table_index,
            "rows": rows,
            "cols": cols,
            "border_style": border_style,
            "has_header_row": has_header_row,
            "shaded_rows": shaded_rows,
        }))
    }
}

// ============================================================================
// Tests
// ============================================================================
