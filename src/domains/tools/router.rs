//! Tool Router - builds the rmcp ToolRouter from the tool definitions.
//!
//! Each tool knows how to create its own route, so adding a tool only means
//! adding one `with_route` line here and one entry in the registry.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use crate::core::config::Config;

use super::definitions::{
    AddBookmarkTool, AddHeadingTool, AddParagraphTool, AddSequenceCaptionTool, AddTableTool,
    ApplyDocumentStyleTool, CreateDocumentTool, FindTextInDocumentTool, FormatTableTool,
    GetDocumentInfoTool, GetDocumentOutlineTool, GetDocumentTextTool, InsertRefFieldTool,
    InsertTableOfContentsTool, ListAvailableDocumentsTool, SearchAndReplaceTool,
    SetHeadersFootersTool, SetParagraphFormatTool,
};
use super::handlers::DocxTool;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(config: Arc<Config>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(ListAvailableDocumentsTool::create_route(config.clone()))
        .with_route(GetDocumentInfoTool::create_route(config.clone()))
        .with_route(GetDocumentTextTool::create_route(config.clone()))
        .with_route(GetDocumentOutlineTool::create_route(config.clone()))
        .with_route(FindTextInDocumentTool::create_route(config.clone()))
        .with_route(CreateDocumentTool::create_route(config.clone()))
        .with_route(SearchAndReplaceTool::create_route(config.clone()))
        .with_route(AddParagraphTool::create_route(config.clone()))
        .with_route(AddHeadingTool::create_route(config.clone()))
        .with_route(AddTableTool::create_route(config.clone()))
        .with_route(FormatTableTool::create_route(config.clone()))
        .with_route(SetParagraphFormatTool::create_route(config.clone()))
        .with_route(ApplyDocumentStyleTool::create_route(config.clone()))
        .with_route(SetHeadersFootersTool::create_route(config.clone()))
        .with_route(InsertTableOfContentsTool::create_route(config.clone()))
        .with_route(AddSequenceCaptionTool::create_route(config.clone()))
        .with_route(AddBookmarkTool::create_route(config.clone()))
        .with_route(InsertRefFieldTool::create_route(config))
}
