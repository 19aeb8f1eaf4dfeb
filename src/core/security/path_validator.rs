use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::core::config::Config;

/// Errors that can occur while resolving a document path
#[derive(Debug, thiserror::Error)]
pub enum PathSecurityError {
    #[error("Directory does not exist: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("DOCX file does not exist: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Path is not a file: {path}")]
    NotAFile { path: PathBuf },

    #[error("Only .docx files are supported: {path}")]
    InvalidExtension { path: PathBuf },

    #[error("Output directory does not exist: {path}")]
    OutputDirectoryNotFound { path: PathBuf },

    #[error("Path '{path}' is outside allowed root directory '{root}'")]
    OutsideRootDirectory { path: PathBuf, root: PathBuf },

    #[error("IO error for path '{path}': {error}")]
    IoError { path: PathBuf, error: io::Error },
}

impl PathSecurityError {
    /// The path the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            Self::DirectoryNotFound { path }
            | Self::NotADirectory { path }
            | Self::FileNotFound { path }
            | Self::NotAFile { path }
            | Self::InvalidExtension { path }
            | Self::OutputDirectoryNotFound { path }
            | Self::OutsideRootDirectory { path, .. }
            | Self::IoError { path, .. } => path,
        }
    }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(input: &str) -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    expand_home_with(input, home.as_deref())
}

fn expand_home_with(input: &str, home: Option<&Path>) -> PathBuf {
    match (input.strip_prefix('~'), home) {
        (Some(""), Some(home)) => home.to_path_buf(),
        (Some(rest), Some(home)) if rest.starts_with('/') => home.join(rest.trim_start_matches('/')),
        _ => PathBuf::from(input),
    }
}

/// Expand `~`, anchor relative paths at the working directory and resolve
/// symlinks where the path exists. Missing paths are cleaned lexically.
fn absolutize(input: &Path) -> Result<PathBuf, PathSecurityError> {
    let path = if input.is_absolute() {
        input.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|error| PathSecurityError::IoError {
                path: input.to_path_buf(),
                error,
            })?
            .join(input)
    };
    Ok(path
        .canonicalize()
        .unwrap_or_else(|_| lexical_normalize(&path)))
}

/// Drop `.` components and fold `..` into their parent without touching the filesystem.
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

fn has_docx_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"))
}

/// Checks if a path is within (or equal to) a root directory
fn is_within_root(path: &Path, root: &Path) -> bool {
    path.starts_with(root)
}

/// Reject `path` when a root is configured and the path lies outside it.
fn ensure_within_root(path: &Path, config: &Config) -> Result<(), PathSecurityError> {
    let Some(ref root) = config.security.root_path else {
        return Ok(());
    };

    let canonical_root = root.canonicalize().map_err(|e| PathSecurityError::IoError {
        path: root.clone(),
        error: e,
    })?;

    if !is_within_root(path, &canonical_root) {
        return Err(PathSecurityError::OutsideRootDirectory {
            path: path.to_path_buf(),
            root: canonical_root,
        });
    }
    Ok(())
}

/// Resolve the directory to list: the given one, else the configured default
/// documents directory, else the working directory.
pub fn resolve_directory(
    directory: Option<&str>,
    config: &Config,
) -> Result<PathBuf, PathSecurityError> {
    let base = match directory {
        Some(directory) => expand_home(directory),
        None => match &config.documents.default_directory {
            Some(default) => expand_home(&default.to_string_lossy()),
            None => std::env::current_dir().map_err(|error| PathSecurityError::IoError {
                path: PathBuf::from("."),
                error,
            })?,
        },
    };
    let resolved = absolutize(&base)?;

    if !resolved.exists() {
        return Err(PathSecurityError::DirectoryNotFound { path: resolved });
    }
    if !resolved.is_dir() {
        return Err(PathSecurityError::NotADirectory { path: resolved });
    }
    ensure_within_root(&resolved, config)?;
    Ok(resolved)
}

/// Resolve an existing `.docx` file to read.
pub fn resolve_docx_path(filename: &str, config: &Config) -> Result<PathBuf, PathSecurityError> {
    let resolved = absolutize(&expand_home(filename))?;

    if !resolved.exists() {
        return Err(PathSecurityError::FileNotFound { path: resolved });
    }
    if !resolved.is_file() {
        return Err(PathSecurityError::NotAFile { path: resolved });
    }
    if !has_docx_extension(&resolved) {
        return Err(PathSecurityError::InvalidExtension { path: resolved });
    }
    ensure_within_root(&resolved, config)?;
    Ok(resolved)
}

/// Resolve a `.docx` destination. The parent directory must already exist;
/// it is never created.
pub fn resolve_output_docx_path(
    output: &str,
    config: &Config,
) -> Result<PathBuf, PathSecurityError> {
    let resolved = absolutize(&expand_home(output))?;

    if !has_docx_extension(&resolved) {
        return Err(PathSecurityError::InvalidExtension { path: resolved });
    }
    let parent = resolved.parent().map(Path::to_path_buf).unwrap_or_default();
    if !parent.is_dir() {
        return Err(PathSecurityError::OutputDirectoryNotFound { path: parent });
    }
    ensure_within_root(&parent, config)?;
    Ok(resolved)
}

/// Source and destination of an in-place or copy-on-write edit.
pub fn resolve_for_write(
    filename: &str,
    output_filename: Option<&str>,
    config: &Config,
) -> Result<(PathBuf, PathBuf), PathSecurityError> {
    let source = resolve_docx_path(filename, config)?;
    let destination = match output_filename {
        Some(output) => resolve_output_docx_path(output, config)?,
        None => source.clone(),
    };
    Ok((source, destination))
}

/// Regular `.docx` files directly inside `directory`, sorted by lowercase name.
pub fn list_docx_files(directory: &Path) -> Result<Vec<PathBuf>, PathSecurityError> {
    let entries = fs::read_dir(directory).map_err(|error| PathSecurityError::IoError {
        path: directory.to_path_buf(),
        error,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_file() && has_docx_extension(path))
        .collect();
    files.sort_by_key(|path| {
        path.file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    });
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_config(root: Option<PathBuf>) -> Config {
        let mut config = Config::default();
        config.security.root_path = root;
        config
    }

    fn touch(path: &Path) {
        fs::write(path, b"PK").unwrap();
    }

    #[test]
    fn test_no_root_allows_existing_docx() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("report.docx");
        touch(&file);

        let result = resolve_docx_path(file.to_str().unwrap(), &create_test_config(None));
        assert_eq!(result.unwrap(), file.canonicalize().unwrap());
    }

    #[test]
    fn test_missing_file_and_wrong_kind() {
        let temp_dir = TempDir::new().unwrap();
        let config = create_test_config(None);

        let missing = temp_dir.path().join("missing.docx");
        assert!(matches!(
            resolve_docx_path(missing.to_str().unwrap(), &config),
            Err(PathSecurityError::FileNotFound { .. })
        ));

        let folder = temp_dir.path().join("folder.docx");
        fs::create_dir(&folder).unwrap();
        assert!(matches!(
            resolve_docx_path(folder.to_str().unwrap(), &config),
            Err(PathSecurityError::NotAFile { .. })
        ));

        let text = temp_dir.path().join("notes.txt");
        touch(&text);
        assert!(matches!(
            resolve_docx_path(text.to_str().unwrap(), &config),
            Err(PathSecurityError::InvalidExtension { .. })
        ));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("LOUD.DOCX");
        touch(&file);
        assert!(resolve_docx_path(file.to_str().unwrap(), &create_test_config(None)).is_ok());
    }

    #[test]
    fn test_path_outside_root() {
        let root_dir = TempDir::new().unwrap();
        let outside_dir = TempDir::new().unwrap();
        let outside_file = outside_dir.path().join("outside.docx");
        touch(&outside_file);

        let config = create_test_config(Some(root_dir.path().to_path_buf()));
        let result = resolve_docx_path(outside_file.to_str().unwrap(), &config);

        assert!(matches!(
            result,
            Err(PathSecurityError::OutsideRootDirectory { .. })
        ));
    }

    #[test]
    fn test_path_traversal_blocked() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();
        touch(&temp_dir.path().join("secret.docx"));

        let config = create_test_config(Some(subdir.clone()));
        let traversal_path = subdir.join("../secret.docx");

        let result = resolve_docx_path(traversal_path.to_str().unwrap(), &config);
        assert!(matches!(
            result,
            Err(PathSecurityError::OutsideRootDirectory { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_outside_root() {
        use std::os::unix::fs::symlink;

        let root_dir = TempDir::new().unwrap();
        let outside_dir = TempDir::new().unwrap();
        let target_file = outside_dir.path().join("target.docx");
        let link_file = root_dir.path().join("link.docx");

        touch(&target_file);
        symlink(&target_file, &link_file).unwrap();

        let config = create_test_config(Some(root_dir.path().to_path_buf()));
        let result = resolve_docx_path(link_file.to_str().unwrap(), &config);

        assert!(matches!(
            result,
            Err(PathSecurityError::OutsideRootDirectory { .. })
        ));
    }

    #[test]
    fn test_output_extension_checked_before_directory() {
        let config = create_test_config(None);
        assert!(matches!(
            resolve_output_docx_path("/no/such/dir/out.txt", &config),
            Err(PathSecurityError::InvalidExtension { .. })
        ));
        assert!(matches!(
            resolve_output_docx_path("/no/such/dir/out.docx", &config),
            Err(PathSecurityError::OutputDirectoryNotFound { .. })
        ));
    }

    #[test]
    fn test_output_may_not_exist_yet() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("new.docx");
        let config = create_test_config(Some(temp_dir.path().to_path_buf()));

        let resolved = resolve_output_docx_path(output.to_str().unwrap(), &config).unwrap();
        assert_eq!(resolved.file_name().unwrap(), "new.docx");
        assert!(!resolved.exists());
    }

    #[test]
    fn test_resolve_for_write_defaults_to_in_place() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.docx");
        touch(&file);
        let config = create_test_config(None);

        let (source, destination) = resolve_for_write(file.to_str().unwrap(), None, &config).unwrap();
        assert_eq!(source, destination);

        let copy = temp_dir.path().join("b.docx");
        let (_, destination) =
            resolve_for_write(file.to_str().unwrap(), Some(copy.to_str().unwrap()), &config).unwrap();
        assert_eq!(destination.file_name().unwrap(), "b.docx");
    }

    #[test]
    fn test_directory_resolution() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("plain.docx");
        touch(&file);
        let config = create_test_config(None);

        assert!(resolve_directory(Some(temp_dir.path().to_str().unwrap()), &config).is_ok());
        assert!(matches!(
            resolve_directory(Some(file.to_str().unwrap()), &config),
            Err(PathSecurityError::NotADirectory { .. })
        ));
        assert!(matches!(
            resolve_directory(Some("/definitely/not/here"), &config),
            Err(PathSecurityError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn test_directory_defaults_to_configured_documents_dir() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = create_test_config(None);
        config.documents.default_directory = Some(temp_dir.path().to_path_buf());

        let resolved = resolve_directory(None, &config).unwrap();
        assert_eq!(resolved, temp_dir.path().canonicalize().unwrap());
    }

    #[test]
    fn test_list_docx_files_sorted_case_insensitively() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir.path().join("beta.docx"));
        touch(&temp_dir.path().join("Alpha.DOCX"));
        touch(&temp_dir.path().join("gamma.txt"));
        fs::create_dir(temp_dir.path().join("dir.docx")).unwrap();

        let names: Vec<_> = list_docx_files(temp_dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["Alpha.DOCX", "beta.docx"]);
    }

    #[test]
    fn test_expand_home() {
        let home = Path::new("/home/writer");
        assert_eq!(expand_home_with("~", Some(home)), PathBuf::from("/home/writer"));
        assert_eq!(
            expand_home_with("~/docs/a.docx", Some(home)),
            PathBuf::from("/home/writer/docs/a.docx")
        );
        assert_eq!(expand_home_with("~other", Some(home)), PathBuf::from("~other"));
        assert_eq!(expand_home_with("~/x", None), PathBuf::from("~/x"));
    }

    #[test]
    fn test_lexical_normalize() {
        assert_eq!(
            lexical_normalize(Path::new("/a/./b/../c.docx")),
            PathBuf::from("/a/c.docx")
        );
    }
}
