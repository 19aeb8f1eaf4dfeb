// Security module for document path resolution and access control
//
// This module turns user-supplied filenames into validated absolute paths and,
// when a root directory is configured, keeps every read and write inside it.

pub mod path_validator;

pub use path_validator::{
    PathSecurityError, expand_home, list_docx_files, resolve_directory, resolve_docx_path,
    resolve_for_write, resolve_output_docx_path,
};
