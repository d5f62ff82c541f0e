use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::entry_map::EntryMap;
use crate::error::{Error, Result};
use crate::manifest;
use crate::paths;

/// Canonical filename for the public-mirror copy.
pub const BUNDLE_FILENAME: &str = "bundle.js";

/// Explicit configuration for one pass's distribution work, passed at the
/// call site. No ambient singleton.
#[derive(Debug, Clone)]
pub struct DistributorConfig {
    pub enabled: bool,
    pub public_root: PathBuf,
    pub source_root: PathBuf,
}

/// Post-build fan-out: for every compiled artifact, a default copy into the
/// public mirror, then any extra copies its project manifest asks for.
pub struct ArtifactDistributor {
    config: DistributorConfig,
}

/// Distribution outcome for one project. `mirror` is the default copy's
/// destination when it succeeded; failures are collected, never rethrown
/// across projects.
#[derive(Debug)]
pub struct ProjectDistribution {
    pub identity: PathBuf,
    pub mirror: Option<PathBuf>,
    pub extra_copies: Vec<PathBuf>,
    pub failures: Vec<Error>,
}

/// Aggregated outcome of one pass's distribution, one item per entry.
#[derive(Debug, Default)]
pub struct DistributionReport {
    pub projects: Vec<ProjectDistribution>,
}

impl DistributionReport {
    pub fn failure_count(&self) -> usize {
        self.projects.iter().map(|p| p.failures.len()).sum()
    }
}

/// One pending copy: stream the artifact into `dest_dir/filename`,
/// creating the directory first. Not retried, not persisted.
struct CopyTask {
    source: PathBuf,
    dest_dir: PathBuf,
    filename: String,
}

impl CopyTask {
    async fn run(self) -> Result<PathBuf> {
        // Idempotent create; racing tasks targeting the same directory are
        // fine, "already exists" is not an error.
        tokio::fs::create_dir_all(&self.dest_dir)
            .await
            .map_err(|source| Error::CreateDir {
                path: self.dest_dir.clone(),
                source,
            })?;

        let dest = self.dest_dir.join(&self.filename);
        copy_stream(&self.source, &dest).await?;
        Ok(dest)
    }
}

/// Streamed byte copy, always overwriting the destination. Never buffers the
/// whole artifact in memory.
async fn copy_stream(from: &Path, to: &Path) -> Result<()> {
    let copy_err = |source| Error::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    let mut reader = tokio::fs::File::open(from).await.map_err(copy_err)?;
    let mut writer = tokio::fs::File::create(to).await.map_err(copy_err)?;
    tokio::io::copy(&mut reader, &mut writer).await.map_err(copy_err)?;
    writer.flush().await.map_err(copy_err)?;

    Ok(())
}

impl ArtifactDistributor {
    pub fn new(config: DistributorConfig) -> Self {
        Self { config }
    }

    /// Fan out every artifact in the entry map. Called exactly once per build
    /// pass, after all artifacts are finalized. Projects run concurrently and
    /// unordered; the call joins all of them (and every copy task they spawn)
    /// before returning, so no copy is left in flight at end of pass.
    ///
    /// A no-op with zero side effects unless distribution was enabled.
    pub async fn distribute(&self, entries: &EntryMap) -> DistributionReport {
        if !self.config.enabled {
            debug!("distribution disabled, skipping fan-out");
            return DistributionReport::default();
        }

        let mut handles = Vec::new();
        for (output, source) in entries.iter() {
            let config = self.config.clone();
            let artifact = output.to_path_buf();
            let entry_source = source.to_path_buf();
            handles.push(tokio::spawn(distribute_project(config, artifact, entry_source)));
        }

        let mut report = DistributionReport::default();
        for handle in handles {
            match handle.await {
                Ok(project) => report.projects.push(project),
                Err(e) => warn!("distribution task abandoned: {}", e),
            }
        }

        if report.failure_count() > 0 {
            warn!("distribution finished with {} failure(s)", report.failure_count());
        }

        report
    }
}

/// One project's default-copy-then-fan-out workflow. Every failure is
/// recorded here; nothing escapes to the other projects.
async fn distribute_project(
    config: DistributorConfig,
    artifact: PathBuf,
    entry_source: PathBuf,
) -> ProjectDistribution {
    let project_dir = entry_source
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let identity = match paths::project_identity(&config.source_root, &project_dir) {
        Ok(identity) => identity,
        Err(error) => {
            warn!("cannot resolve project identity: {}", error);
            return ProjectDistribution {
                identity: project_dir,
                mirror: None,
                extra_copies: Vec::new(),
                failures: vec![error],
            };
        }
    };

    let mut mirror = None;
    let mut extra_copies = Vec::new();
    let mut failures = Vec::new();

    // Default copy first; a manifest failure later must not undo it.
    let mirror_task = CopyTask {
        source: artifact.clone(),
        dest_dir: config.public_root.join(&identity),
        filename: BUNDLE_FILENAME.to_string(),
    };
    match mirror_task.run().await {
        Ok(dest) => {
            debug!("mirrored {} -> {}", artifact.display(), dest.display());
            mirror = Some(dest);
        }
        Err(error) => {
            warn!("default copy failed for {}: {}", identity.display(), error);
            failures.push(error);
        }
    }

    match manifest::load(&project_dir).await {
        Ok(rules) => {
            let artifact_filename = artifact
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| BUNDLE_FILENAME.to_string());

            let mut copy_handles = Vec::new();
            for rule in rules {
                let task = CopyTask {
                    source: artifact.clone(),
                    dest_dir: rule.dir,
                    filename: rule.filename.unwrap_or_else(|| artifact_filename.clone()),
                };
                copy_handles.push(tokio::spawn(task.run()));
            }

            for handle in copy_handles {
                match handle.await {
                    Ok(Ok(dest)) => extra_copies.push(dest),
                    Ok(Err(error)) => {
                        warn!("copy task failed for {}: {}", identity.display(), error);
                        failures.push(error);
                    }
                    Err(e) => warn!("copy task abandoned for {}: {}", identity.display(), e),
                }
            }
        }
        Err(error) => {
            // Fan-out is skipped for this project only; the mirror stands.
            warn!("manifest error for {}: {}", identity.display(), error);
            failures.push(error);
        }
    }

    ProjectDistribution {
        identity,
        mirror,
        extra_copies,
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry_map::ProjectEntry;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_disabled_distributor_has_zero_side_effects() {
        let tmp = TempDir::new().unwrap();
        let source_root = tmp.path().join("projects");
        let public_root = tmp.path().join("public");
        fs::create_dir_all(source_root.join("alpha/dist")).unwrap();
        fs::write(source_root.join("alpha/app.js"), "a").unwrap();
        fs::write(source_root.join("alpha/dist/alpha.js"), "bundled").unwrap();

        let entry =
            ProjectEntry::for_source(source_root.join("alpha/app.js"), &source_root).unwrap();
        let map = EntryMap::from_entries(vec![entry]).unwrap();

        let distributor = ArtifactDistributor::new(DistributorConfig {
            enabled: false,
            public_root: public_root.clone(),
            source_root,
        });
        let report = distributor.distribute(&map).await;

        assert!(report.projects.is_empty());
        assert!(!public_root.exists());
    }

    #[tokio::test]
    async fn test_streamed_copy_overwrites_destination() {
        let tmp = TempDir::new().unwrap();
        let from = tmp.path().join("artifact.js");
        let to = tmp.path().join("copy.js");
        fs::write(&from, "new contents").unwrap();
        fs::write(&to, "a much longer prior file that must not survive").unwrap();

        copy_stream(&from, &to).await.unwrap();

        assert_eq!(fs::read_to_string(&to).unwrap(), "new contents");
    }

    #[tokio::test]
    async fn test_copy_task_creates_missing_directories() {
        let tmp = TempDir::new().unwrap();
        let from = tmp.path().join("artifact.js");
        fs::write(&from, "payload").unwrap();

        let task = CopyTask {
            source: from,
            dest_dir: tmp.path().join("a/b/c"),
            filename: "out.js".to_string(),
        };
        let dest = task.run().await.unwrap();

        assert_eq!(dest, tmp.path().join("a/b/c/out.js"));
        assert_eq!(fs::read_to_string(dest).unwrap(), "payload");
    }
}
