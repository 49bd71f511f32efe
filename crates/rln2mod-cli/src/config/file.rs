use crate::error::{CliError, Result};
use directories::ProjectDirs;
use rln2mod::engine::config::{DiscoveryPolicy, FailurePolicy};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConverterConfig {
    pub program: Option<String>,
    pub args: Option<Vec<String>>,
}

/// Settings read from a TOML file. Every key is optional.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub output_dir: Option<PathBuf>,
    pub discovery: Option<DiscoveryPolicy>,
    pub particle_suffix: Option<String>,
    pub table_extension: Option<String>,
    pub on_error: Option<FailurePolicy>,
    pub jobs: Option<usize>,
    pub converter: Option<FileConverterConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// `<config_dir>/rln2mod/config.toml`, e.g. `~/.config/rln2mod/config.toml` on Linux.
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "rln2mod").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Loads the explicit file when given, otherwise the per-user file if it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::user_config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => {
                debug!("No configuration file found; using built-in defaults.");
                Ok(Self::default())
            }
        }
    }
}
