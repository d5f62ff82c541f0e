use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::paths;
use crate::scanner::ProjectScanner;

/// Conventional entry file name marking a project directory.
pub const ENTRY_FILENAME: &str = "app.js";

/// Extension of the bundled artifact.
pub const BUNDLE_EXT: &str = "js";

/// Per-project output directory name.
pub const DIST_DIR: &str = "dist";

/// One discovered project: its entry file and where the Compiler must place
/// the bundled artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEntry {
    pub source_path: PathBuf,
    pub output_path: PathBuf,
}

impl ProjectEntry {
    /// Derive an entry from a project's entry file:
    /// `output_path = <projectDir>/dist/<lastSegment(projectDir)>.js`.
    pub fn for_source(source_path: PathBuf, source_root: &Path) -> Result<Self> {
        let project_dir = source_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        // An entry file sitting at the source root has no project directory.
        paths::project_identity(source_root, &project_dir)?;

        let filename =
            paths::output_filename(&project_dir, BUNDLE_EXT).ok_or(Error::OutsideProjectRoot {
                path: project_dir.clone(),
                root: source_root.to_path_buf(),
            })?;

        let output_path = project_dir.join(DIST_DIR).join(filename);

        Ok(Self {
            source_path,
            output_path,
        })
    }

    /// The project directory the entry file sits in.
    pub fn project_dir(&self) -> &Path {
        self.source_path.parent().unwrap_or(Path::new(""))
    }
}

/// Mapping from output path to source path, keys unique, immutable once
/// constructed. Consumed read-only by the Compiler and the Distributor.
#[derive(Debug, Default)]
pub struct EntryMap {
    entries: BTreeMap<PathBuf, PathBuf>,
}

impl EntryMap {
    /// Build the map, validating key uniqueness. Two entries producing the
    /// same output path fail fast instead of silently overwriting.
    pub fn from_entries(entries: Vec<ProjectEntry>) -> Result<Self> {
        let mut map: BTreeMap<PathBuf, PathBuf> = BTreeMap::new();

        for entry in entries {
            if let Some(first) = map.get(&entry.output_path) {
                return Err(Error::OutputCollision {
                    output: entry.output_path,
                    first: first.clone(),
                    second: entry.source_path,
                });
            }
            map.insert(entry.output_path, entry.source_path);
        }

        Ok(Self { entries: map })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate as (output_path, source_path) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.entries
            .iter()
            .map(|(output, source)| (output.as_path(), source.as_path()))
    }
}

/// A per-identifier (or per-candidate) failure collected during mapping.
/// Continue-on-error: one bad entry never aborts the whole batch.
#[derive(Debug)]
pub struct ProjectFailure {
    pub identifier: String,
    pub error: Error,
}

/// Result of one mapping run: the map plus the continue-on-error residue.
#[derive(Debug)]
pub struct EntryMapReport {
    pub map: EntryMap,
    pub failures: Vec<ProjectFailure>,
}

/// Builds the canonical entry map from an explicit selector list or by
/// discovery over the whole source root.
pub struct EntryMapBuilder {
    source_root: PathBuf,
}

impl EntryMapBuilder {
    pub fn new(source_root: impl AsRef<Path>) -> Result<Self> {
        let source_root = source_root.as_ref();

        if !source_root.exists() {
            return Err(Error::NotFound {
                path: source_root.to_path_buf(),
            });
        }

        let source_root = source_root.canonicalize().map_err(|source| Error::Scan {
            path: source_root.to_path_buf(),
            source,
        })?;

        Ok(Self { source_root })
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Explicit mode: resolve each identifier against the source root
    /// independently. A missing or out-of-root identifier is reported and
    /// skipped; the remaining identifiers are still processed.
    pub fn from_selectors(&self, selectors: &[String]) -> Result<EntryMapReport> {
        let mut entries = Vec::new();
        let mut failures = Vec::new();

        for selector in selectors {
            match self.resolve_selector(selector) {
                Ok(entry) => {
                    debug!("mapped project '{}' -> {}", selector, entry.output_path.display());
                    entries.push(entry);
                }
                Err(error) => {
                    warn!("skipping project '{}': {}", selector, error);
                    failures.push(ProjectFailure {
                        identifier: selector.clone(),
                        error,
                    });
                }
            }
        }

        Ok(EntryMapReport {
            map: EntryMap::from_entries(entries)?,
            failures,
        })
    }

    fn resolve_selector(&self, selector: &str) -> Result<ProjectEntry> {
        let project_dir = self.source_root.join(selector);

        if !project_dir.is_dir() {
            return Err(Error::NotFound { path: project_dir });
        }

        // Canonicalize so `..` segments cannot escape the source root.
        let project_dir = project_dir.canonicalize().map_err(|source| Error::Scan {
            path: project_dir.clone(),
            source,
        })?;
        paths::project_identity(&self.source_root, &project_dir)?;

        let source_path = project_dir.join(ENTRY_FILENAME);
        if !source_path.is_file() {
            return Err(Error::NotFound { path: source_path });
        }

        ProjectEntry::for_source(source_path, &self.source_root)
    }

    /// Discovery mode: walk the whole source root and keep every file named
    /// after the entry-file convention.
    pub fn discover(&self) -> Result<EntryMapReport> {
        let scanner = ProjectScanner::new(&self.source_root)?;
        let mut entries = Vec::new();
        let mut failures = Vec::new();

        for candidate in scanner.scan()? {
            if candidate.file_name().and_then(|n| n.to_str()) != Some(ENTRY_FILENAME) {
                continue;
            }

            match ProjectEntry::for_source(candidate.clone(), &self.source_root) {
                Ok(entry) => entries.push(entry),
                Err(error) => {
                    warn!("skipping entry file {}: {}", candidate.display(), error);
                    failures.push(ProjectFailure {
                        identifier: candidate.display().to_string(),
                        error,
                    });
                }
            }
        }

        debug!("discovered {} projects under {}", entries.len(), self.source_root.display());

        Ok(EntryMapReport {
            map: EntryMap::from_entries(entries)?,
            failures,
        })
    }
}
