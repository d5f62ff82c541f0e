use std::fs;
use std::path::Path;
use std::process::Command;

use crate::entry_map::EntryMap;
use crate::error::{Error, Result};

/// The external compilation step. Synchronous from the orchestrator's
/// viewpoint; the entry map is consumed read-only.
pub trait Compiler {
    fn compile(&self, entries: &EntryMap) -> Result<()>;
}

/// Subprocess-backed bundler invocation, one call per entry:
/// `<program> <source> --bundle --outfile=<output> [extra args...]`.
pub struct BundlerCommand {
    program: String,
    extra_args: Vec<String>,
}

impl BundlerCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
        }
    }

    pub fn extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    fn command_for(&self, source: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(source);
        cmd.arg("--bundle");
        cmd.arg(format!("--outfile={}", output.display()));
        cmd.args(&self.extra_args);
        cmd
    }

    fn compile_entry(&self, source: &Path, output: &Path) -> Result<()> {
        if let Some(dist_dir) = output.parent() {
            fs::create_dir_all(dist_dir).map_err(|source| Error::CreateDir {
                path: dist_dir.to_path_buf(),
                source,
            })?;
        }

        let output_result =
            self.command_for(source, output)
                .output()
                .map_err(|e| Error::Compiler {
                    message: format!("failed to execute '{}': {}", self.program, e),
                })?;

        if !output_result.status.success() {
            let stderr = String::from_utf8_lossy(&output_result.stderr);
            return Err(Error::Compiler {
                message: format!("'{}' failed for {}: {}", self.program, source.display(), stderr),
            });
        }

        Ok(())
    }
}

impl Compiler for BundlerCommand {
    /// The first failing entry aborts the pass; distribution must never run
    /// over partially compiled output.
    fn compile(&self, entries: &EntryMap) -> Result<()> {
        for (output, source) in entries.iter() {
            self.compile_entry(source, output)?;
        }
        Ok(())
    }
}
