use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Extract the last path segment as a string, e.g. `/abc/def/ghi` => `ghi`.
pub fn last_segment(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}

/// Output filename for a project directory: `<lastSegment(dir)>.<ext>`.
pub fn output_filename(project_dir: &Path, ext: &str) -> Option<String> {
    last_segment(project_dir).map(|segment| format!("{}.{}", segment, ext))
}

/// Derive a project's identity by stripping the source root prefix from its
/// directory. The directory must sit strictly below the root; the root itself
/// is not a project.
pub fn project_identity(source_root: &Path, project_dir: &Path) -> Result<PathBuf> {
    match project_dir.strip_prefix(source_root) {
        Ok(identity) if !identity.as_os_str().is_empty() => Ok(identity.to_path_buf()),
        _ => Err(Error::OutsideProjectRoot {
            path: project_dir.to_path_buf(),
            root: source_root.to_path_buf(),
        }),
    }
}
