//! File reading capability used to load helper scripts, hooks and specs.

use std::path::Path;

use crate::error::{Error, Result};

/// Reads whole files as text.
pub trait FileReader {
    /// Returns the full contents of the file at `path`.
    fn read(&self, path: &Path) -> Result<String>;
}

/// Reads files from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileReader;

impl LocalFileReader {
    /// Creates a new local file reader.
    pub fn new() -> Self {
        Self
    }
}

impl FileReader for LocalFileReader {
    fn read(&self, path: &Path) -> Result<String> {
        tracing::debug!(path = ?path, "reading file");
        std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })
    }
}
