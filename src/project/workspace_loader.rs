use std::path::{Path, PathBuf};

use rayon::prelude::*;

use super::error::LoadError;
use super::file_loader;
use crate::ide::AnalysisHost;

/// Convert a filesystem path into a `file://` URI.
pub fn path_to_uri(path: &Path) -> String {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    let text = absolute.to_string_lossy().replace('\\', "/");
    if text.starts_with('/') {
        format!("file://{text}")
    } else {
        format!("file:///{text}")
    }
}

/// Loads workspace files from disk into an [`AnalysisHost`].
#[derive(Debug, Default)]
pub struct WorkspaceLoader;

impl WorkspaceLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load every Blueprint file under `path`. Returns the number of files
    /// registered.
    ///
    /// Files are read in parallel and registered in path order. Any read
    /// failure aborts the load before the host is touched.
    pub fn load_directory_into_host<P: Into<PathBuf>>(
        &self,
        path: P,
        host: &mut AnalysisHost,
    ) -> Result<usize, LoadError> {
        let path = path.into();
        if !path.is_dir() {
            return Err(LoadError::NotADirectory(path));
        }

        let paths = file_loader::collect_file_paths(&path)?;
        let files = paths
            .par_iter()
            .map(|p| file_loader::load_file(p).map(|text| (path_to_uri(p), text)))
            .collect::<Result<Vec<_>, _>>()?;

        for (uri, text) in &files {
            host.set_file_content(uri, text);
        }
        tracing::info!(root = %path.display(), files = files.len(), "loaded workspace");
        Ok(files.len())
    }

    /// Load a single file into the host.
    pub fn load_file_into_host<P: AsRef<Path>>(
        &self,
        path: P,
        host: &mut AnalysisHost,
    ) -> Result<(), LoadError> {
        let path = path.as_ref();
        let text = file_loader::load_file(path)?;
        host.set_file_content(&path_to_uri(path), &text);
        Ok(())
    }
}
