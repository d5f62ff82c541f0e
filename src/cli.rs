use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::compiler::BundlerCommand;
use crate::entry_map::{EntryMapBuilder, EntryMapReport};
use crate::logger;
use crate::paths;
use crate::pipeline::{BuildPass, PassConfig};

#[derive(Parser)]
#[command(name = "bundlefan")]
#[command(about = "A tiny, predictable multi-project bundle orchestrator with manifest-driven artifact fan-out")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile every mapped project and distribute the artifacts
    Build {
        /// Directory containing one subdirectory per project
        #[arg(long, default_value = "src/projects")]
        source_root: PathBuf,

        /// Comma-separated project identifiers (omit to discover all projects)
        #[arg(long, value_delimiter = ',')]
        projects: Option<Vec<String>>,

        /// Copy artifacts to the public mirror and manifest destinations
        #[arg(long)]
        distribute: bool,

        /// Destination root for the default mirror copy
        #[arg(long, default_value = "public")]
        public_root: PathBuf,

        /// Bundler executable to invoke per entry
        #[arg(long, default_value = "esbuild")]
        bundler: String,

        /// Extra argument passed through to the bundler (repeatable)
        #[arg(long = "bundler-arg")]
        bundler_args: Vec<String>,
    },

    /// Print the entry map without compiling
    Entries {
        /// Directory containing one subdirectory per project
        #[arg(long, default_value = "src/projects")]
        source_root: PathBuf,

        /// Comma-separated project identifiers (omit to discover all projects)
        #[arg(long, value_delimiter = ',')]
        projects: Option<Vec<String>>,
    },

    /// Check system requirements and configuration
    Doctor {
        /// Directory containing one subdirectory per project
        #[arg(long, default_value = "src/projects")]
        source_root: PathBuf,

        /// Bundler executable to look for
        #[arg(long, default_value = "esbuild")]
        bundler: String,
    },
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);

    match cli.command {
        Commands::Build {
            source_root,
            projects,
            distribute,
            public_root,
            bundler,
            bundler_args,
        } => {
            build_command(
                source_root,
                projects,
                distribute,
                public_root,
                bundler,
                bundler_args,
            )
            .await
        }
        Commands::Entries {
            source_root,
            projects,
        } => entries_command(source_root, projects),
        Commands::Doctor {
            source_root,
            bundler,
        } => doctor_command(source_root, bundler),
    }
}

async fn build_command(
    source_root: PathBuf,
    projects: Option<Vec<String>>,
    distribute: bool,
    public_root: PathBuf,
    bundler: String,
    bundler_args: Vec<String>,
) -> Result<()> {
    let pass = BuildPass::new(PassConfig {
        source_root,
        project_selector: projects,
        enable_distribution: distribute,
        public_root,
    });

    let compiler = BundlerCommand::new(bundler).extra_args(bundler_args);

    let report = pass.run(&compiler).await.context("Build pass failed")?;

    for failure in &report.entry_failures {
        println!("✗ skipped '{}': {}", failure.identifier, failure.error);
    }

    if report.entries.is_empty() {
        println!("No projects mapped, nothing was compiled");
        return Ok(());
    }

    println!("Compiled {} project(s)", report.entries.len());

    if !distribute {
        return Ok(());
    }

    for project in &report.distribution.projects {
        if let Some(mirror) = &project.mirror {
            println!("Mirrored {} -> {}", project.identity.display(), mirror.display());
        }
        for copy in &project.extra_copies {
            println!("Copied {} -> {}", project.identity.display(), copy.display());
        }
        for failure in &project.failures {
            println!("✗ {}: {}", project.identity.display(), failure);
        }
    }

    let failure_count = report.distribution.failure_count();
    if failure_count > 0 {
        println!("\nDistribution finished with {} failure(s)", failure_count);
    }

    Ok(())
}

fn entries_command(source_root: PathBuf, projects: Option<Vec<String>>) -> Result<()> {
    let builder = EntryMapBuilder::new(&source_root)
        .with_context(|| format!("Failed to open source root {}", source_root.display()))?;

    let EntryMapReport { map, failures } = match projects {
        Some(selectors) => builder
            .from_selectors(&selectors)
            .context("Failed to map the selected projects")?,
        None => builder.discover().context("Failed to discover projects")?,
    };

    println!("Entry map ({} project(s)):", map.len());
    for (output, source) in map.iter() {
        println!("  {} <- {}", output.display(), source.display());
    }

    for failure in &failures {
        println!("✗ skipped '{}': {}", failure.identifier, failure.error);
    }

    Ok(())
}

fn doctor_command(source_root: PathBuf, bundler: String) -> Result<()> {
    println!("Bundlefan Doctor - Checking system requirements...\n");

    match which::which(&bundler) {
        Ok(path) => println!("✓ bundler '{}' found at: {}", bundler, path.display()),
        Err(_) => {
            println!("✗ bundler '{}' not found", bundler);
            println!("  Install it or pass another executable with --bundler");
        }
    }

    if source_root.is_dir() {
        println!("✓ source root found at: {}", source_root.display());
    } else {
        println!("✗ source root not found: {}", source_root.display());
        println!("  Pass the projects directory with --source-root");
        return Ok(());
    }

    let builder = EntryMapBuilder::new(&source_root)?;
    let EntryMapReport { map, failures } = builder.discover()?;

    println!("\nDiscovered projects: {}", map.len());
    for (_, source) in map.iter().take(5) {
        let project_dir = source.parent().unwrap_or(source);
        if let Ok(identity) = paths::project_identity(builder.source_root(), project_dir) {
            println!("    {}", identity.display());
        }
    }
    if map.len() > 5 {
        println!("    ... and {} more", map.len() - 5);
    }

    for failure in &failures {
        println!("✗ skipped '{}': {}", failure.identifier, failure.error);
    }

    println!("\n✓ Bundlefan doctor check complete");

    Ok(())
}
