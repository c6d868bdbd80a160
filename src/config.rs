//! Configuration loading for the fixtures CLI
//!
//! The configuration is a small JSON file holding the football-data.org API key
//! and the team cache policy. It is read once at startup and never modified.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

/// File name used for the team cache when the config does not name one
const DEFAULT_TEAMS_FILE: &str = "teams.json";

/// Errors that can occur when loading the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON or is missing required fields
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// API key and team cache policy
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Token sent in the `X-Auth-Token` header
    pub api_key: String,
    /// Where the team list is cached
    #[serde(default = "default_teams_file")]
    pub teams_file: PathBuf,
    /// Whether the team list is read from and written to the cache
    #[serde(default)]
    pub persist_teams: bool,
    /// Whether an empty cache triggers a refetch from the API
    #[serde(default)]
    pub rebuild_if_no_teams: bool,
}

/// Resolves the default cache file inside the XDG cache directory
///
/// Falls back to the working directory when no home directory is available.
fn default_teams_file() -> PathBuf {
    ProjectDirs::from("", "", "homefixtures")
        .map(|dirs| dirs.cache_dir().join(DEFAULT_TEAMS_FILE))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TEAMS_FILE))
}

impl Config {
    /// Parses a configuration from its JSON text
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses the configuration file at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }
}
