//! Core module containing shared infrastructure components.
//!
//! Configuration, path security, the server handler and the transports.
//! Errors are typed per layer: `PathSecurityError` here, `TransportError` in
//! the transports, `DocxError` in the document model and `ToolError` in tools.

pub mod config;
pub mod security;
pub mod server;
pub mod transport;

pub use config::Config;
pub use security::{PathSecurityError, resolve_docx_path, resolve_for_write};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
