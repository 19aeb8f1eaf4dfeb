//! Tools domain module.
//!
//! Every tool opens a .docx file, reads or edits it, and answers with a JSON
//! envelope: `{"ok": true, "result": ...}` or `{"ok": false, "error": ...}`.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations grouped by area
//! - `handlers.rs` - The `DocxTool` trait shared by every tool
//! - `coerce.rs` - Lenient parsing of booleans, numbers, lists and colors
//! - `router.rs` - Dynamic ToolRouter builder for STDIO transport
//! - `registry.rs` - Central tool registry and HTTP dispatch
//! - `error.rs` - Error codes and envelopes
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in the matching `definitions/` group
//! 2. Define the params struct and implement `DocxTool::run`
//! 3. Export it from the group's `mod.rs` and `definitions/mod.rs`
//! 4. Add the route in `router.rs` using `with_route()`
//! 5. Register it in `registry.rs` for HTTP support
//!
//! **No need to modify `server.rs`!** The router is built dynamically.

pub mod coerce;
pub mod definitions;
mod error;
mod handlers;
mod registry;
pub mod router;

pub use error::{ErrorCode, ToolError, success_envelope};
pub use handlers::DocxTool;
pub use registry::ToolRegistry;
pub use router::build_tool_router;
