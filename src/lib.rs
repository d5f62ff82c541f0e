pub mod paths;
pub mod scanner;
pub mod entry_map;
pub mod manifest;
pub mod compiler;
pub mod distributor;
pub mod pipeline;
pub mod error;
pub mod logger;
pub mod cli;

pub use error::{Error, Result};
pub use pipeline::{BuildPass, PassConfig, PassReport};
