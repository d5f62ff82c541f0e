use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Scan root or an explicitly named project directory is absent
    #[error("path not found: {path}")]
    NotFound { path: PathBuf },

    /// I/O failure while walking the source tree
    #[error("failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Entry or identifier does not resolve to a project directory under the source root
    #[error("'{path}' is not a project directory under '{root}'")]
    OutsideProjectRoot { path: PathBuf, root: PathBuf },

    /// Two entries map to the same output path
    #[error("output path collision: '{first}' and '{second}' both produce '{output}'")]
    OutputCollision {
        output: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },

    /// Manifest file exists but could not be read
    #[error("failed to read manifest {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest file is not a valid list of copy rules
    #[error("invalid manifest {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Destination directory could not be created
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Copy task failed mid-transfer
    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external bundler could not be launched or exited nonzero
    #[error("bundler failed: {message}")]
    Compiler { message: String },
}
