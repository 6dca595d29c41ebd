//! Errors surfaced by CLI commands.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything `apigen generate` can fail with.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("no input document: pass --input or set `input` in apigen.toml")]
    MissingInput,

    #[error(transparent)]
    Generate(#[from] apigen_core::Error),
}
