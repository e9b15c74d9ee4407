use std::fs;
use std::path::{Path, PathBuf};

use crate::source::{SourceError, SourceFile};

/// Separator between paths typed into the open-files prompt.
pub const PATH_LIST_SEPARATOR: char = ',';

pub fn sources_from_paths(paths: &[PathBuf]) -> Vec<SourceFile> {
    paths
        .iter()
        .map(|path| SourceFile::local(display_name(path), path.clone()))
        .collect()
}

pub fn read_source(path: &Path) -> Result<String, SourceError> {
    fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Splits a comma separated list of paths, expanding a leading `~`.
pub fn split_path_list(input: &str) -> Vec<PathBuf> {
    input
        .split(PATH_LIST_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(expand_home)
        .collect()
}

pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix('~')
        && (rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\'))
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest.trim_start_matches(['/', '\\']));
    }
    PathBuf::from(path)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
