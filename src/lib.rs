//! DOCX MCP Server Library
//!
//! A Model Context Protocol (MCP) server whose tools read and edit Word
//! `.docx` documents without Word installed.
//!
//! # Architecture
//!
//! - **core**: configuration, path security, transports and the server
//! - **docx**: an in-memory model of a `.docx` package (body, styles, sections,
//!   headers and footers, fields) that loads and saves through `zip` and `quick-xml`
//! - **domains**: the MCP-facing layer
//!   - **tools**: one file per tool, each returning a JSON envelope
//!
//! # Example
//!
//! ```rust,no_run
//! use docx_mcp_server::{core::McpServer, core::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config);
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod docx;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, McpServer};
