//! `apigen.toml` loading.
//!
//! ```toml
//! input = "openapi.yaml"
//! output = "src/lib/api.ts"
//! flavor = "react-query"
//! mode = "aggregate"
//! preamble = "// generated, do not edit"
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use std::path::{Path, PathBuf};

use apigen_core::{Flavor, RenderMode};
use serde::Deserialize;

use crate::error::CliError;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "apigen.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub flavor: Option<Flavor>,
    pub mode: Option<RenderMode>,
    /// Replaces the flavor's own preamble.
    pub preamble: Option<String>,
}

impl GeneratorConfig {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&raw).map_err(|source| CliError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(base) = path.parent() {
            config.input = config.input.map(|p| base.join(p));
            config.output = config.output.map(|p| base.join(p));
        }
        Ok(config)
    }

    /// The explicit config if given, else `./apigen.toml` when present,
    /// else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, CliError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(CONFIG_FILE);
                if default.is_file() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
