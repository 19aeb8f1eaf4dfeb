//! Domains module containing the MCP-facing business logic.
//!
//! Only tools are exposed; the document model they operate on lives in
//! [`crate::docx`].

pub mod tools;
