//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - HTTP dispatch for tool calls (when http feature is enabled)
//! - Tool metadata for listing

use std::sync::Arc;
#[cfg(feature = "http")]
use tracing::warn;

use rmcp::model::Tool;

use crate::core::config::Config;

use super::definitions::{
    AddBookmarkTool, AddHeadingTool, AddParagraphTool, AddSequenceCaptionTool, AddTableTool,
    ApplyDocumentStyleTool, CreateDocumentTool, FindTextInDocumentTool, FormatTableTool,
    GetDocumentInfoTool, GetDocumentOutlineTool, GetDocumentTextTool, InsertRefFieldTool,
    InsertTableOfContentsTool, ListAvailableDocumentsTool, SearchAndReplaceTool,
    SetHeadersFootersTool, SetParagraphFormatTool,
};
use super::handlers::DocxTool;

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
///
/// This struct provides a central point for:
/// - Listing all available tools
/// - Dispatching HTTP tool calls (when http feature is enabled)
pub struct ToolRegistry {
    #[cfg_attr(not(feature = "http"), allow(dead_code))]
    config: Arc<Config>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            ListAvailableDocumentsTool::NAME,
            GetDocumentInfoTool::NAME,
            GetDocumentTextTool::NAME,
            GetDocumentOutlineTool::NAME,
            FindTextInDocumentTool::NAME,
            CreateDocumentTool::NAME,
            SearchAndReplaceTool::NAME,
            AddParagraphTool::NAME,
            AddHeadingTool::NAME,
            AddTableTool::NAME,
            FormatTableTool::NAME,
            SetParagraphFormatTool::NAME,
            ApplyDocumentStyleTool::NAME,
            SetHeadersFootersTool::NAME,
            InsertTableOfContentsTool::NAME,
            AddSequenceCaptionTool::NAME,
            AddBookmarkTool::NAME,
            InsertRefFieldTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// This is the single source of truth for all available tools.
    /// Both HTTP and STDIO transports use this to get tool metadata.
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            ListAvailableDocumentsTool::to_tool(),
            GetDocumentInfoTool::to_tool(),
            GetDocumentTextTool::to_tool(),
            GetDocumentOutlineTool::to_tool(),
            FindTextInDocumentTool::to_tool(),
            CreateDocumentTool::to_tool(),
            SearchAndReplaceTool::to_tool(),
            AddParagraphTool::to_tool(),
            AddHeadingTool::to_tool(),
            AddTableTool::to_tool(),
            FormatTableTool::to_tool(),
            SetParagraphFormatTool::to_tool(),
            ApplyDocumentStyleTool::to_tool(),
            SetHeadersFootersTool::to_tool(),
            InsertTableOfContentsTool::to_tool(),
            AddSequenceCaptionTool::to_tool(),
            AddBookmarkTool::to_tool(),
            InsertRefFieldTool::to_tool(),
        ]
    }

    /// Dispatch an HTTP tool call to the appropriate handler.
    ///
    /// This is used by the HTTP transport to call tools.
    #[cfg(feature = "http")]
    pub fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        let config = self.config.clone();
        match name {
            ListAvailableDocumentsTool::NAME => ListAvailableDocumentsTool::http_handler(arguments, config),
            GetDocumentInfoTool::NAME => GetDocumentInfoTool::http_handler(arguments, config),
            GetDocumentTextTool::NAME => GetDocumentTextTool::http_handler(arguments, config),
            GetDocumentOutlineTool::NAME => GetDocumentOutlineTool::http_handler(arguments, config),
            FindTextInDocumentTool::NAME => FindTextInDocumentTool::http_handler(arguments, config),
            CreateDocumentTool::NAME => CreateDocumentTool::http_handler(arguments, config),
            SearchAndReplaceTool::NAME => SearchAndReplaceTool::http_handler(arguments, config),
            AddParagraphTool::NAME => AddParagraphTool::http_handler(arguments, config),
            AddHeadingTool::NAME => AddHeadingTool::http_handler(arguments, config),
            AddTableTool::NAME => AddTableTool::http_handler(arguments, config),
            FormatTableTool::NAME => FormatTableTool::http_handler(arguments, config),
            SetParagraphFormatTool::NAME => SetParagraphFormatTool::http_handler(arguments, config),
            ApplyDocumentStyleTool::NAME => ApplyDocumentStyleTool::http_handler(arguments, config),
            SetHeadersFootersTool::NAME => SetHeadersFootersTool::http_handler(arguments, config),
            InsertTableOfContentsTool::NAME => {
                InsertTableOfContentsTool::http_handler(arguments, config)
            }
            AddSequenceCaptionTool::NAME => AddSequenceCaptionTool::http_handler(arguments, config),
            AddBookmarkTool::NAME => AddBookmarkTool::http_handler(arguments, config),
            InsertRefFieldTool::NAME => InsertRefFieldTool::http_handler(arguments, config),
            _ => {
                warn!("Unknown tool requested: {}", name);
                Err(format!("Unknown tool: {}", name))
            }
        }
    }
}
