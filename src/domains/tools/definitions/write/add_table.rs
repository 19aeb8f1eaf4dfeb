//! Add table tool definition.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::core::config::Config;
use crate::core::security::resolve_for_write;
use crate::docx::table::set_cell_text;
use crate::domains::tools::coerce::{LooseInt, LooseMatrix};
use crate::domains::tools::definitions::common::{display_path, open_document, save_document};
use crate::domains::tools::error::{ErrorCode, ToolError};
use crate::domains::tools::handlers::DocxTool;

/// Parameters for the add table tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddTableParams {
    /// Path to the .docx file.
    pub filename: String,

    /// Number of rows (> 0).
    pub rows: LooseInt,

    /// Number of columns (> 0).
    pub cols: LooseInt,

    /// Initial cell values: a 2D list, a JSON string, or one row per line
    /// with tab- or comma-separated cells. Values beyond the grid are ignored.
    #[serde(default)]
    pub data: Option<LooseMatrix>,

    /// Write the result here instead of editing in place.
    #[serde(default)]
    pub output_filename: Option<String>,
}

/// Appends a table, optionally pre-filled.
pub struct AddTableTool;

impl DocxTool for AddTableTool {
    const NAME: &'static str = "add_table";

    const DESCRIPTION: &'static str =
        "Append a table with given rows/cols and optional initial data matrix.";

    type Params = AddTableParams;
    type Output = Value;

    #[instrument(skip_all, fields(filename = %params.filename))]
    fn run(params: AddTableParams, config: &Config) -> Result<Value, ToolError> {
        let rows = params.rows.parse("rows")?;
        let cols = params.cols.parse("cols")?;
        let data = match &params.data {
            Some(data) => data.parse("data")?,
            None => None,
        };
        if rows <= 0 || cols <= 0 {
            return Err(ToolError::new(
                ErrorCode::InvalidTableDimensions,
                "rows and cols must be greater than 0.",
            )
            .with_detail("rows", rows)
            .with_detail("cols", cols));
        }
        let (row_count, col_count) = (rows as usize, cols as usize);

        let (source, destination) =
            resolve_for_write(&params.filename, params.output_filename.as_deref(), config)?;
        let mut document = open_document(&source)?;

        let mut table = document.add_table(row_count, col_count);
        let data = data.unwrap_or_default();
        for (r_idx, values) in data.iter().take(row_count).enumerate() {
            for (c_idx, value) in values.iter().take(col_count).enumerate() {
                if let Some(cell) = table.cell_mut(r_idx, c_idx) {
                    set_cell_text(cell, value);
                }
            }
        }
        let table_index = document.table_count() - 1;

        save_document(&document, &destination)?;

        info!("Added {}x{} table at index {}", rows, cols, table_index);

        Ok(json!({
            "source_path": display_path(&source),
            "output_path": display_path(&destination),
            "table_index": table_index,
            "rows": rows,
            "cols": cols,
            "filled_rows": row_count.min(data.len()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::Document;
    use crate::domains::tools::definitions::common::seed_document;
    use std::path::Path;
    use tempfile::TempDir;

    fn params(path: &Path, rows: i64, cols: i64, data: Option<LooseMatrix>) -> AddTableParams {
        AddTableParams {
            filename: path.to_string_lossy().to_string(),
            rows: LooseInt::Int(rows),
            cols: LooseInt::Int(cols),
            data,
            output_filename: None,
        }
    }

    #[test]
    fn test_data_is_clipped_to_grid() {
        let temp_dir = TempDir::new().unwrap();
        let path = seed_document(temp_dir.path(), "doc.docx", |_| {});
        let data = LooseMatrix::Text("a,b,c\nd,e,f\ng,h,i".to_string());

        let result = AddTableTool::run(params(&path, 2, 2, Some(data)), &Config::default()).unwrap();
        assert_eq!(result["table_index"], json!(0));
        assert_eq!(result["filled_rows"], json!(2));

        let document = Document::open(&path).unwrap();
        let table = document.tables()[0];
        assert_eq!(
            table.cell_texts(),
            vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["d".to_string(), "e".to_string()],
            ]
        );
    }

    #[test]
    fn test_short_data_leaves_cells_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = seed_document(temp_dir.path(), "doc.docx", |_| {});
        let data = LooseMatrix::Rows(vec![json!(["only", null])]);

        let result = AddTableTool::run(params(&path, 3, 2, Some(data)), &Config::default()).unwrap();
        assert_eq!(result["filled_rows"], json!(1));

        let document = Document::open(&path).unwrap();
        let texts = document.tables()[0].cell_texts();
        assert_eq!(texts[0], vec!["only".to_string(), String::new()]);
        assert_eq!(texts[2], vec![String::new(), String::new()]);
    }

    #[test]
    fn test_invalid_dimensions() {
        let temp_dir = TempDir::new().unwrap();
        let path = seed_document(temp_dir.path(), "doc.docx", |_| {});

        let error = AddTableTool::run(params(&path, 0, 3, None), &Config::default()).unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidTableDimensions);
        assert_eq!(error.details["rows"], json!(0));
        assert_eq!(error.details["cols"], json!(3));
    }
}
