//! Find text tool definition.
//!
//! Searches top-level paragraphs and the cells of top-level tables for a
//! literal string, optionally case-sensitive and restricted to whole words.

use regex::{Regex, RegexBuilder};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::core::config::Config;
use crate::core::security::resolve_docx_path;
use crate::docx::Table;
use crate::docx::table::cell_text;
use crate::domains::tools::coerce::{LooseBool, bool_or};
use crate::domains::tools::definitions::common::{display_path, open_document};
use crate::domains::tools::error::{ErrorCode, ToolError};
use crate::domains::tools::handlers::DocxTool;

/// Characters of context kept on each side of a match.
const CONTEXT_CHARS: usize = 30;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the find text tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FindTextParams {
    /// Path to the .docx file.
    pub filename: String,

    /// Literal text to search for.
    pub text_to_find: String,

    /// Match case exactly (default false).
    #[serde(default)]
    pub match_case: Option<LooseBool>,

    /// Only match whole words (default false).
    #[serde(default)]
    pub whole_word: Option<LooseBool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Occurrence {
    pub location: String,
    pub position: usize,
    pub context: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FindTextResult {
    pub query: String,
    pub match_case: bool,
    pub whole_word: bool,
    pub occurrences: Vec<Occurrence>,
    pub total_count: usize,
    pub path: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Finds every occurrence of a string in a document.
pub struct FindTextInDocumentTool;

impl DocxTool for FindTextInDocumentTool {
    const NAME: &'static str = "find_text_in_document";

    const DESCRIPTION: &'static str = "Find text occurrences in document paragraphs and tables.";

    type Params = FindTextParams;
    type Output = FindTextResult;

    #[instrument(skip_all, fields(filename = %params.filename, query = %params.text_to_find))]
    fn run(params: FindTextParams, config: &Config) -> Result<FindTextResult, ToolError> {
        let match_case = bool_or(params.match_case.as_ref(), "match_case", false)?;
        let whole_word = bool_or(params.whole_word.as_ref(), "whole_word", false)?;
        if params.text_to_find.is_empty() {
            return Err(ToolError::new(
                ErrorCode::InvalidQuery,
                "text_to_find cannot be empty",
            ));
        }

        let pattern = build_pattern(&params.text_to_find, match_case, whole_word)?;
        let path = resolve_docx_path(&params.filename, config)?;
        let document = open_document(&path)?;

        let mut occurrences = Vec::new();
        for (index, paragraph) in document.paragraphs().iter().enumerate() {
            collect_matches(
                &paragraph.text(),
                &pattern,
                &format!("Paragraph {index}"),
                &mut occurrences,
            );
        }
        for (t_idx, table) in document.tables().iter().enumerate() {
            for (r_idx, row) in table.rows().into_iter().enumerate() {
                for (c_idx, cell) in Table::cells(row).into_iter().enumerate() {
                    collect_matches(
                        &cell_text(cell),
                        &pattern,
                        &format!("Table {t_idx}, Row {r_idx}, Column {c_idx}"),
                        &mut occurrences,
                    );
                }
            }
        }

        info!("Found {} occurrences in {}", occurrences.len(), path.display());

        Ok(FindTextResult {
            query: params.text_to_find,
            match_case,
            whole_word,
            total_count: occurrences.len(),
            occurrences,
            path: display_path(&path),
        })
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn build_pattern(query: &str, match_case: bool, whole_word: bool) -> Result<Regex, ToolError> {
    let escaped = regex::escape(query);
    let pattern = if whole_word {
        format!(r"\b{escaped}\b")
    } else {
        escaped
    };
    RegexBuilder::new(&pattern)
        .case_insensitive(!match_case)
        .build()
        .map_err(|e| {
            ToolError::new(ErrorCode::InvalidQuery, format!("Cannot search for query: {e}"))
                .with_detail("query", query)
        })
}

/// Record matches with character positions and surrounding context.
fn collect_matches(content: &str, pattern: &Regex, location: &str, out: &mut Vec<Occurrence>) {
    if content.is_empty() {
        return;
    }
    let chars: Vec<char> = content.chars().collect();
    for found in pattern.find_iter(content) {
        let start = content[..found.start()].chars().count();
        let end = start + found.as_str().chars().count();
        let context_start = start.saturating_sub(CONTEXT_CHARS);
        let context_end = (end + CONTEXT_CHARS).min(chars.len());
        out.push(Occurrence {
            location: location.to_string(),
            position: start,
            context: chars[context_start..context_end].iter().collect(),
        });
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::table::set_cell_text;
    use crate::domains::tools::definitions::common::seed_document;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn sample(dir: &TempDir) -> PathBuf {
        seed_document(dir.path(), "doc.docx", |doc| {
            doc.add_paragraph().set_text("The username is stored.");
            doc.add_paragraph().set_text("Each User gets a user id.");
            let mut table = doc.add_table(1, 2);
            set_cell_text(table.cell_mut(0, 1).unwrap(), "user");
        })
    }

    fn params(path: &PathBuf, query: &str, match_case: bool, whole_word: bool) -> FindTextParams {
        FindTextParams {
            filename: path.to_string_lossy().to_string(),
            text_to_find: query.to_string(),
            match_case: Some(LooseBool::Bool(match_case)),
            whole_word: Some(LooseBool::Bool(whole_word)),
        }
    }

    #[test]
    fn test_whole_word_skips_longer_words() {
        let temp_dir = TempDir::new().unwrap();
        let path = sample(&temp_dir);

        let loose = FindTextInDocumentTool::run(params(&path, "user", false, false), &Config::default()).unwrap();
        assert!(loose.occurrences.iter().any(|o| o.location == "Paragraph 0"));

        let whole = FindTextInDocumentTool::run(params(&path, "user", false, true), &Config::default()).unwrap();
        assert!(whole.occurrences.iter().all(|o| o.location != "Paragraph 0"));
        assert_eq!(whole.total_count, 3);
    }

    #[test]
    fn test_match_case_and_locations() {
        let temp_dir = TempDir::new().unwrap();
        let path = sample(&temp_dir);

        let result = FindTextInDocumentTool::run(params(&path, "User", true, false), &Config::default()).unwrap();
        assert_eq!(result.total_count, 1);
        assert_eq!(result.occurrences[0].location, "Paragraph 1");
        assert_eq!(result.occurrences[0].position, 5);

        let result = FindTextInDocumentTool::run(params(&path, "user", true, true), &Config::default()).unwrap();
        let locations: Vec<_> = result.occurrences.iter().map(|o| o.location.as_str()).collect();
        assert_eq!(locations, vec!["Paragraph 1", "Table 0, Row 0, Column 1"]);
    }

    #[test]
    fn test_context_window_counts_characters() {
        let mut out = Vec::new();
        let content = format!("{}é-needle-{}", "a".repeat(40), "b".repeat(40));
        let pattern = build_pattern("needle", true, false).unwrap();
        collect_matches(&content, &pattern, "Paragraph 0", &mut out);

        assert_eq!(out[0].position, 42);
        assert_eq!(out[0].context.chars().count(), 30 + 6 + 30);
        assert!(out[0].context.starts_with(&format!("{}é-", "a".repeat(28))));
    }

    #[test]
    fn test_empty_query_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = sample(&temp_dir);
        let error = FindTextInDocumentTool::run(params(&path, "", false, false), &Config::default()).unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidQuery);
    }

    #[test]
    fn test_special_characters_are_literal() {
        let pattern = build_pattern("a.b(", false, false).unwrap();
        assert!(pattern.is_match("x a.b( y"));
        assert!(!pattern.is_match("axb("));
    }
}
