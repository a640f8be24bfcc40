//! Blueprint file discovery and reading.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::error::LoadError;
use crate::base::constants::BLUEPRINT_EXT;

/// Whether `path` has the Blueprint extension.
pub fn is_blueprint_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == BLUEPRINT_EXT)
}

/// Collect every Blueprint file under `dir`, sorted by path.
///
/// Hidden entries (names starting with `.`) are skipped, directories included.
pub fn collect_file_paths(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let mut paths = Vec::new();
    let walker = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()));

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && is_blueprint_file(entry.path()) {
            paths.push(entry.into_path());
        }
    }

    paths.sort();
    Ok(paths)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Read one file as UTF-8 text.
pub fn load_file(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|e| LoadError::io(path, e))
}
