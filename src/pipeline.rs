use std::path::PathBuf;

use tracing::{info, warn};

use crate::compiler::Compiler;
use crate::distributor::{ArtifactDistributor, DistributionReport, DistributorConfig};
use crate::entry_map::{EntryMap, EntryMapBuilder, EntryMapReport, ProjectFailure};
use crate::error::Result;

/// Configuration for one build pass, consumed from the surrounding
/// orchestration layer.
#[derive(Debug, Clone)]
pub struct PassConfig {
    /// Directory containing one subdirectory per project.
    pub source_root: PathBuf,
    /// Explicit project identifiers; `None` means discovery over the root.
    pub project_selector: Option<Vec<String>>,
    /// Gates all ArtifactDistributor activity.
    pub enable_distribution: bool,
    /// Destination root for the default mirror copy.
    pub public_root: PathBuf,
}

/// Outcome of one pass: the entry map that was compiled, the mapping
/// failures that were skipped over, and the distribution report.
#[derive(Debug)]
pub struct PassReport {
    pub entries: EntryMap,
    pub entry_failures: Vec<ProjectFailure>,
    pub distribution: DistributionReport,
}

/// One discovery -> compile -> distribute cycle. Owns the entry map for the
/// duration of the pass; the Compiler and the Distributor only borrow it.
pub struct BuildPass {
    config: PassConfig,
}

impl BuildPass {
    pub fn new(config: PassConfig) -> Self {
        Self { config }
    }

    pub async fn run(&self, compiler: &dyn Compiler) -> Result<PassReport> {
        let builder = EntryMapBuilder::new(&self.config.source_root)?;

        let EntryMapReport { map, failures } = match &self.config.project_selector {
            Some(selectors) => builder.from_selectors(selectors)?,
            None => builder.discover()?,
        };

        if map.is_empty() {
            warn!("no projects mapped under {}, nothing to compile", builder.source_root().display());
            return Ok(PassReport {
                entries: map,
                entry_failures: failures,
                distribution: DistributionReport::default(),
            });
        }

        info!("compiling {} project(s)", map.len());
        compiler.compile(&map)?;

        let distributor = ArtifactDistributor::new(DistributorConfig {
            enabled: self.config.enable_distribution,
            public_root: self.config.public_root.clone(),
            source_root: builder.source_root().to_path_buf(),
        });
        let distribution = distributor.distribute(&map).await;

        Ok(PassReport {
            entries: map,
            entry_failures: failures,
            distribution,
        })
    }
}
