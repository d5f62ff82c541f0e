use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Recursive depth-first walk over a source tree. Produces absolute paths to
/// every file beneath the root; filtering by filename convention is the
/// caller's responsibility.
pub struct ProjectScanner {
    root: PathBuf,
}

impl ProjectScanner {
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();

        if !root.exists() {
            return Err(Error::NotFound {
                path: root.to_path_buf(),
            });
        }

        // Canonicalize up front so every produced path is absolute.
        let root = root.canonicalize().map_err(|source| Error::Scan {
            path: root.to_path_buf(),
            source,
        })?;

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the whole tree. All-or-nothing: any I/O failure mid-walk discards
    /// partial results.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        self.walk(&self.root, &mut files)?;
        Ok(files)
    }

    fn walk(&self, dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
        let entries = fs::read_dir(dir).map_err(|source| Error::Scan {
            path: dir.to_path_buf(),
            source,
        })?;

        for entry in entries {
            let entry = entry.map_err(|source| Error::Scan {
                path: dir.to_path_buf(),
                source,
            })?;

            let file_type = entry.file_type().map_err(|source| Error::Scan {
                path: entry.path(),
                source,
            })?;

            if file_type.is_dir() {
                self.walk(&entry.path(), files)?;
            } else if file_type.is_file() {
                files.push(entry.path());
            }
            // Anything else (dangling symlinks, sockets) is skipped.
        }

        Ok(())
    }
}
