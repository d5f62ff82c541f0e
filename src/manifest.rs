use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Conventional name of the per-project distribution manifest.
pub const MANIFEST_FILENAME: &str = "output.json";

/// One extra destination for a project's compiled artifact. When `filename`
/// is omitted the artifact's own filename is used.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CopyRule {
    pub dir: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// Load the distribution manifest sitting in `project_dir`, if any.
///
/// Absence is not an error: a project without a manifest simply has no extra
/// destinations. An unreadable or malformed manifest fails with the
/// originating path; the caller isolates that failure to this one project.
pub async fn load(project_dir: &Path) -> Result<Vec<CopyRule>> {
    let path = project_dir.join(MANIFEST_FILENAME);

    let raw = match tokio::fs::read(&path).await {
        Ok(raw) => raw,
        Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => return Err(Error::ManifestRead { path, source }),
    };

    serde_json::from_slice(&raw).map_err(|source| Error::ManifestParse { path, source })
}
