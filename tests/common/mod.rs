#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use bundlefan::compiler::Compiler;
use bundlefan::entry_map::EntryMap;
use bundlefan::error::Result;

/// Stand-in for the external bundler: writes each artifact as a marked copy
/// of its entry file, so tests can check byte-identical distribution.
pub struct MockCompiler;

impl Compiler for MockCompiler {
    fn compile(&self, entries: &EntryMap) -> Result<()> {
        for (output, source) in entries.iter() {
            if let Some(dist_dir) = output.parent() {
                fs::create_dir_all(dist_dir).unwrap();
            }
            let code = fs::read_to_string(source).unwrap();
            fs::write(output, format!("// bundled\n{code}")).unwrap();
        }
        Ok(())
    }
}

/// Create a project directory with a conventional entry file under `root`.
/// `name` may be nested, e.g. `team/gamma`.
pub fn add_project(root: &Path, name: &str) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("app.js"), format!("console.log('{name}');\n")).unwrap();
    dir
}

/// Place a distribution manifest beside a project's entry file.
pub fn write_manifest(project_dir: &Path, json: &str) {
    fs::write(project_dir.join("output.json"), json).unwrap();
}

/// Compile one project's artifact by hand, without going through a pass.
pub fn write_artifact(project_dir: &Path, contents: &str) -> PathBuf {
    let name = project_dir.file_name().unwrap().to_str().unwrap();
    let dist = project_dir.join("dist");
    fs::create_dir_all(&dist).unwrap();
    let artifact = dist.join(format!("{name}.js"));
    fs::write(&artifact, contents).unwrap();
    artifact
}
