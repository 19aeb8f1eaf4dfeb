//! Common utilities shared across document tools.
//!
//! Opening and saving with error mapping, run formatting options, alignment
//! parsing and style lookup.

use std::path::Path;

use tracing::debug;

use crate::docx::{Alignment, Document, RunMut};
use crate::domains::tools::coerce::{normalize_color, optional_color};
use crate::domains::tools::error::{ErrorCode, ToolError};

/// Load a document, mapping package failures to `DOCX_OPEN_FAILED`.
pub fn open_document(path: &Path) -> Result<Document, ToolError> {
    debug!("Opening document: {}", path.display());
    Document::open(path).map_err(|e| {
        ToolError::new(
            ErrorCode::DocxOpenFailed,
            format!("Failed to open DOCX: {}", path.display()),
        )
        .with_detail("error", e.to_string())
    })
}

/// Write a document, mapping failures to `DOCX_SAVE_FAILED`.
pub fn save_document(document: &Document, path: &Path) -> Result<(), ToolError> {
    debug!("Saving document: {}", path.display());
    document.save(path).map_err(|e| {
        ToolError::new(
            ErrorCode::DocxSaveFailed,
            format!("Failed to save DOCX: {}", path.display()),
        )
        .with_detail("error", e.to_string())
    })
}

pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

/// Run-level overrides applied to one or more runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStyle {
    pub font_name: Option<String>,
    pub font_size: Option<f64>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub color: Option<String>,
}

impl RunStyle {
    /// Check font size and normalize the color so failures happen before the
    /// document is opened.
    pub fn validated(mut self) -> Result<Self, ToolError> {
        if let Some(size) = self.font_size {
            if size <= 0.0 {
                return Err(ToolError::new(
                    ErrorCode::InvalidFontSize,
                    "font_size must be greater than 0.",
                )
                .with_detail("font_size", size));
            }
        }
        self.color = optional_color(self.color.as_deref(), "color")?;
        self.font_name = self.font_name.filter(|name| !name.is_empty());
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, run: &mut RunMut<'_>) {
        let mut format = run.format();
        if let Some(name) = &self.font_name {
            format.set_font_name(name);
        }
        if let Some(size) = self.font_size {
            format.set_size(size);
        }
        if let Some(bold) = self.bold {
            format.set_bold(bold);
        }
        if let Some(italic) = self.italic {
            format.set_italic(italic);
        }
        if let Some(color) = &self.color {
            format.set_color(color);
        }
    }
}

/// `true` becomes `Some(true)`; `false` leaves the run's inherited value alone.
pub fn only_if_set(flag: bool) -> Option<bool> {
    flag.then_some(true)
}

/// Parse an alignment name, failing with the supported list.
pub fn parse_alignment(value: &str, field: &str) -> Result<Alignment, ToolError> {
    Alignment::parse(value).ok_or_else(|| {
        ToolError::new(
            ErrorCode::InvalidAlignment,
            format!("{field} must be one of: {}.", Alignment::NAMES.join(", ")),
        )
        .with_detail("field", field)
        .with_detail("value", value)
        .with_detail("supported", Alignment::NAMES)
    })
}

pub fn optional_alignment(value: Option<&str>, field: &str) -> Result<Option<Alignment>, ToolError> {
    match value {
        Some(value) if !value.trim().is_empty() => parse_alignment(value, field).map(Some),
        _ => Ok(None),
    }
}

/// Style id for a user-supplied style name.
pub fn resolve_style(document: &Document, name: &str) -> Result<String, ToolError> {
    document.styles().style_id_for(name).ok_or_else(|| {
        ToolError::new(ErrorCode::StyleNotFound, format!("Style not found: {name}"))
            .with_detail("style", name)
    })
}

/// Check that `index` addresses one of `count` top-level paragraphs.
pub fn paragraph_index(index: i64, count: usize) -> Result<usize, ToolError> {
    usize::try_from(index)
        .ok()
        .filter(|index| *index < count)
        .ok_or_else(|| {
            ToolError::new(
                ErrorCode::ParagraphIndexOutOfRange,
                format!("paragraph_index {index} is out of range."),
            )
            .with_detail("paragraph_index", index)
            .with_detail("paragraph_count", count)
        })
}

/// Color with a default, normalized.
pub fn color_or(value: Option<&str>, field: &str, default: &str) -> Result<String, ToolError> {
    match value {
        Some(color) if !color.trim().is_empty() => normalize_color(color, field),
        _ => Ok(default.to_string()),
    }
}

/// Write a document built with `build` to `dir/name` and return its path.
#[cfg(test)]
pub fn seed_document(
    dir: &Path,
    name: &str,
    build: impl FnOnce(&mut Document),
) -> std::path::PathBuf {
    let mut document = Document::new().unwrap();
    build(&mut document);
    let path = dir.join(name);
    document.save(&path).unwrap();
    path
}
